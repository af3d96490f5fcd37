use crate::core::grid_index::GridIndexer;
use crate::core::sanitizer::Sanitizer;
use crate::core::{ConfigProvider, Dataset, Pipeline, RawRow, RunSummary, Storage, TransformResult};
use crate::domain::model::{ColumnNames, DroppedRow};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub struct FacilityPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> FacilityPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn output_file(&self, file_name: &str) -> String {
        Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}

/// Column positions of the required fields within the header.
struct ColumnLayout {
    name: usize,
    description: usize,
    latitude: usize,
    longitude: usize,
}

impl ColumnLayout {
    fn resolve(headers: &[String], columns: &ColumnNames) -> Result<Self> {
        let position = |wanted: &str| headers.iter().position(|h| h == wanted);

        match columns.required().map(|c| position(c)) {
            [Some(name), Some(description), Some(latitude), Some(longitude)] => Ok(Self {
                name,
                description,
                latitude,
                longitude,
            }),
            _ => Err(EtlError::MissingColumns {
                missing: columns
                    .required()
                    .into_iter()
                    .filter(|c| position(*c).is_none())
                    .map(str::to_string)
                    .collect(),
            }),
        }
    }
}

fn field_text(record: &csv::ByteRecord, index: usize) -> String {
    record
        .get(index)
        .map(|f| String::from_utf8_lossy(f).into_owned())
        .unwrap_or_default()
}

fn parse_coordinate(raw: Option<&[u8]>) -> Option<f64> {
    raw.and_then(|v| std::str::from_utf8(v).ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
}

/// 解析 CSV：表頭決定欄位位置，資料列不足的欄位視為空值
pub fn parse_dataset(data: &[u8], columns: &ColumnNames) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let header = String::from_utf8_lossy(h);
            if i == 0 {
                header.trim_start_matches('\u{feff}').to_string()
            } else {
                header.into_owned()
            }
        })
        .collect();

    let layout = ColumnLayout::resolve(&headers, columns)?;

    let mut rows = Vec::new();
    for (i, record) in reader.byte_records().enumerate() {
        let fields = record?;

        // 只有名稱與描述需要解碼；原始位元組保留給 dropped rows
        rows.push(RawRow {
            row_number: i + 1,
            name: field_text(&fields, layout.name),
            description: field_text(&fields, layout.description),
            latitude: parse_coordinate(fields.get(layout.latitude)),
            longitude: parse_coordinate(fields.get(layout.longitude)),
            fields,
        });
    }

    Ok(Dataset { headers, rows })
}

/// 被丟棄的資料列原樣輸出，不加索引欄
pub fn dropped_rows_csv(headers: &[String], dropped: &[DroppedRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for dropped_row in dropped {
        writer.write_byte_record(&dropped_row.row.fields)?;
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FacilityPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::debug!("Reading facility list from: {}", self.config.input_file());
        let data = self.storage.read_file(self.config.input_file()).await?;

        let dataset = parse_dataset(&data, self.config.columns())?;
        tracing::debug!(
            "Parsed {} rows with columns: {}",
            dataset.rows.len(),
            dataset.headers.join(", ")
        );

        Ok(dataset)
    }

    async fn transform(&self, data: Dataset) -> Result<TransformResult> {
        let sanitizer = Sanitizer::new(self.config.sanitizer_rules().clone());
        let outcome = sanitizer.sanitize(data.rows);

        tracing::info!(
            "Sanitized: {} valid ({} swapped), {} dropped",
            outcome.stats.valid,
            outcome.stats.swapped,
            outcome.stats.dropped_total()
        );
        for (reason, count) in &outcome.stats.dropped {
            tracing::info!("  dropped {} row(s): {}", count, reason);
        }

        let indexer = GridIndexer::new(self.config.cell_size_deg())?;
        let index = indexer.build(&outcome.facilities)?;

        Ok(TransformResult {
            headers: data.headers,
            facilities: outcome.facilities,
            index,
            dropped: outcome.dropped,
            stats: outcome.stats,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<RunSummary> {
        let facilities_path = self.output_file(self.config.facilities_file());
        let index_path = self.output_file(self.config.index_file());
        let dropped_path = self.output_file(self.config.dropped_file());

        // serde_json 不會跳脫非 ASCII 字元，輸出為精簡 UTF-8
        let facilities_json = serde_json::to_vec(&result.facilities)?;
        self.storage
            .write_file(&facilities_path, &facilities_json)
            .await?;
        tracing::debug!("Wrote {} ({} bytes)", facilities_path, facilities_json.len());

        let index_json = serde_json::to_vec(&result.index)?;
        self.storage.write_file(&index_path, &index_json).await?;
        tracing::debug!("Wrote {} ({} bytes)", index_path, index_json.len());

        let dropped_csv = dropped_rows_csv(&result.headers, &result.dropped)?;
        self.storage.write_file(&dropped_path, &dropped_csv).await?;
        tracing::debug!("Wrote {} ({} bytes)", dropped_path, dropped_csv.len());

        Ok(RunSummary {
            facilities: result.facilities.len(),
            cells: result.index.cell_count(),
            dropped: result.dropped.len(),
            dropped_path,
            written: true,
        })
    }
}
