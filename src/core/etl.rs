use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting facility grid build...");
        self.monitor.log_stats("Start");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", raw_data.rows.len());
        self.monitor.log_stats("Extract");

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Transformed into {} facilities across {} cells",
            transformed.facilities.len(),
            transformed.index.cell_count()
        );
        self.monitor.log_stats("Transform");

        // Load
        let summary = self.pipeline.load(transformed).await?;
        tracing::info!("Dropped rows saved to: {}", summary.dropped_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }

    /// Extract and transform only; nothing is written.
    pub async fn dry_run(&self) -> Result<RunSummary> {
        tracing::info!("Starting dry run...");

        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", raw_data.rows.len());

        let transformed = self.pipeline.transform(raw_data).await?;
        self.monitor.log_final_stats();

        Ok(RunSummary {
            facilities: transformed.facilities.len(),
            cells: transformed.index.cell_count(),
            dropped: transformed.dropped.len(),
            dropped_path: String::new(),
            written: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Dataset, RawRow, TransformResult};
    use crate::core::grid_index::GridIndexer;
    use crate::core::sanitizer::Sanitizer;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubPipeline {
        loaded: AtomicBool,
    }

    fn raw(lat: f64, lng: f64) -> RawRow {
        RawRow {
            row_number: 1,
            name: "Stub".to_string(),
            description: String::new(),
            latitude: Some(lat),
            longitude: Some(lng),
            fields: csv::ByteRecord::new(),
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Dataset> {
            Ok(Dataset {
                headers: vec!["Name".to_string()],
                rows: vec![raw(14.0, 121.0), raw(14.001, 121.001), raw(300.0, 300.0)],
            })
        }

        async fn transform(&self, data: Dataset) -> Result<TransformResult> {
            let outcome = Sanitizer::default().sanitize(data.rows);
            let index = GridIndexer::new(1.0)?.build(&outcome.facilities)?;
            Ok(TransformResult {
                headers: data.headers,
                facilities: outcome.facilities,
                index,
                dropped: outcome.dropped,
                stats: outcome.stats,
            })
        }

        async fn load(&self, result: TransformResult) -> Result<RunSummary> {
            self.loaded.store(true, Ordering::SeqCst);
            Ok(RunSummary {
                facilities: result.facilities.len(),
                cells: result.index.cell_count(),
                dropped: result.dropped.len(),
                dropped_path: "dropped_rows.csv".to_string(),
                written: true,
            })
        }
    }

    #[tokio::test]
    async fn test_run_goes_through_all_phases() {
        let engine = EtlEngine::new(StubPipeline {
            loaded: AtomicBool::new(false),
        });

        let summary = engine.run().await.unwrap();

        assert!(engine.pipeline().loaded.load(Ordering::SeqCst));
        assert_eq!(summary.facilities, 2);
        assert_eq!(summary.cells, 1);
        assert_eq!(summary.dropped, 1);
        assert!(summary.written);
    }

    #[tokio::test]
    async fn test_dry_run_skips_load() {
        let engine = EtlEngine::new_with_monitoring(
            StubPipeline {
                loaded: AtomicBool::new(false),
            },
            false,
        );

        let summary = engine.dry_run().await.unwrap();

        assert!(!engine.pipeline().loaded.load(Ordering::SeqCst));
        assert!(!summary.written);
        assert_eq!(summary.facilities, 2);
        assert!(summary.to_string().contains("dry run"));
    }
}
