// ==========================================
// 葡萄酒贸易数据分析 - 分析编排器
// ==========================================
// 流程: 质量审计 → 商业化 CAGR → 出口单价
// 红线: 单个阶段跳过不影响后续阶段；跳过的阶段不写文件
// ==========================================

use crate::config::analysis_config::{
    AnalysisConfig, COMMERCIALIZATION_FILES, EXPORT_QUANTITY_FILE, EXPORT_VALUE_FILE,
    QUALITY_AUDIT_FILES,
};
use crate::domain::{CagrRecord, RawTable, Resolution, SkipReason, Stage, StageOutcome};
use crate::engine::growth::GrowthAnalyzer;
use crate::engine::price::PriceAnalyzer;
use crate::engine::quality_auditor::QualityAuditor;
use crate::importer::column_resolver::{find_year_columns, ColumnResolver};
use crate::importer::file_parser::CsvTableLoader;
use crate::importer::importer_trait::TableLoader;
use crate::output::ReportWriter;
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// AnalysisOrchestrator - 分析编排器
// ==========================================

pub struct AnalysisOrchestrator<L = CsvTableLoader>
where
    L: TableLoader,
{
    config: AnalysisConfig,
    loader: L,
    resolver: ColumnResolver,
    auditor: QualityAuditor,
    growth: GrowthAnalyzer,
    writer: ReportWriter,
}

impl AnalysisOrchestrator<CsvTableLoader> {
    /// 使用默认加载级联创建编排器
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_loader(config, CsvTableLoader::new())
    }
}

impl<L> AnalysisOrchestrator<L>
where
    L: TableLoader,
{
    pub fn with_loader(config: AnalysisConfig, loader: L) -> Self {
        Self {
            resolver: ColumnResolver::new(config.loose_entity_match),
            auditor: QualityAuditor::new(),
            growth: GrowthAnalyzer::new(),
            writer: ReportWriter::new(&config.output_dir),
            loader,
            config,
        }
    }

    /// 依次执行三个阶段
    ///
    /// # 返回
    /// - Ok(outcomes): 每个阶段一个结果（写出或跳过）
    /// - Err: 输出目录或文件写入失败
    pub fn run(&self) -> Result<Vec<StageOutcome>> {
        info!(
            data_dir = %self.config.data_dir.display(),
            output_dir = %self.config.output_dir.display(),
            years = %self.config.years,
            "开始执行分析流程"
        );

        let outcomes = vec![
            self.run_quality_audit()?,
            self.run_growth()?,
            self.run_price()?,
        ];

        let skipped = outcomes.iter().filter(|o| !o.is_written()).count();
        info!(stages = outcomes.len(), skipped, "分析流程完成");
        Ok(outcomes)
    }

    // ==========================================
    // 阶段1: 质量审计
    // ==========================================

    /// 对所有存在且可加载的文件做质量统计；两个报告文件总是写出
    #[instrument(skip(self))]
    pub fn run_quality_audit(&self) -> Result<StageOutcome> {
        let mut reports = Vec::new();
        for file_name in QUALITY_AUDIT_FILES {
            let path = self.config.input_path(file_name);
            if !path.exists() {
                debug!(file = file_name, "文件不存在，跳过审计");
                continue;
            }
            match self.loader.load(&path) {
                Ok(table) => reports.push(self.auditor.audit(&table, file_name)),
                Err(e) => warn!(file = file_name, error = %e, "文件加载失败，跳过审计"),
            }
        }

        let json = self.writer.write_quality_report(&reports)?;
        let csv = self.writer.write_quality_summary(&reports)?;
        info!(files = reports.len(), "质量审计完成");
        Ok(StageOutcome::Written {
            stage: Stage::QualityAudit,
            artifacts: vec![json, csv],
        })
    }

    // ==========================================
    // 阶段2: 商业化 CAGR
    // ==========================================

    #[instrument(skip(self))]
    pub fn run_growth(&self) -> Result<StageOutcome> {
        let records = match self.prepare_growth() {
            Ok(records) => records,
            Err(reason) => return Ok(self.skip(Stage::Growth, reason)),
        };

        let path = self.writer.write_cagr(&records)?;
        info!(entities = records.len(), "CAGR 结果已写出");
        Ok(StageOutcome::Written {
            stage: Stage::Growth,
            artifacts: vec![path],
        })
    }

    fn prepare_growth(&self) -> Resolution<Vec<CagrRecord>> {
        let (file_name, path) = COMMERCIALIZATION_FILES
            .iter()
            .map(|name| (*name, self.config.input_path(name)))
            .find(|(_, path)| path.exists())
            .ok_or(SkipReason::CommercializationMissing)?;

        let table = self.load_for_stage(file_name, &path)?;

        let entity_column = self
            .resolver
            .find_entity_column(&table)
            .ok_or_else(|| SkipReason::NoEntityColumn {
                file: file_name.to_string(),
            })?;

        let years = find_year_columns(&table, &self.config.years);
        self.growth
            .compute_cagr(&table, &entity_column, &years)
            .ok_or_else(|| SkipReason::NoYearColumns {
                file: file_name.to_string(),
            })
    }

    // ==========================================
    // 阶段3: 出口单价
    // ==========================================

    #[instrument(skip(self))]
    pub fn run_price(&self) -> Result<StageOutcome> {
        let quantity_path = self.config.input_path(EXPORT_QUANTITY_FILE);
        let value_path = self.config.input_path(EXPORT_VALUE_FILE);
        if !quantity_path.exists() || !value_path.exists() {
            return Ok(self.skip(Stage::Price, SkipReason::ExportPairMissing));
        }

        let quantity = match self.load_for_stage(EXPORT_QUANTITY_FILE, &quantity_path) {
            Ok(table) => table,
            Err(reason) => return Ok(self.skip(Stage::Price, reason)),
        };
        let value = match self.load_for_stage(EXPORT_VALUE_FILE, &value_path) {
            Ok(table) => table,
            Err(reason) => return Ok(self.skip(Stage::Price, reason)),
        };

        let analyzer = PriceAnalyzer::new(self.config.years, self.resolver.clone());
        let table = match analyzer.compute_price_per_unit(&quantity, &value) {
            Ok(table) => table,
            Err(reason) => return Ok(self.skip(Stage::Price, reason)),
        };

        let path = self.writer.write_price_table(&table)?;
        Ok(StageOutcome::Written {
            stage: Stage::Price,
            artifacts: vec![path],
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn load_for_stage(&self, file_name: &str, path: &Path) -> Resolution<RawTable> {
        self.loader.load(path).map_err(|e| {
            warn!(file = file_name, error = %e, "文件加载失败");
            SkipReason::LoadFailed {
                file: file_name.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn skip(&self, stage: Stage, reason: SkipReason) -> StageOutcome {
        info!(%stage, reason = %reason, "阶段跳过");
        StageOutcome::Skipped { stage, reason }
    }
}
