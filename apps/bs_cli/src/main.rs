// apps/bs_cli/src/main.rs

//! BoogieScape 命令行界面
//!
//! 把描述农业景观的矢量图层集转换为水文模拟平台可用的
//! 派生图层集的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于应用层：只负责参数解析、日志初始化和协作者装配，
//! 全部派生语义在 `bs_core` 中。

use anyhow::Result;
use bs_core::Pipeline;
use bs_io::{workspace, DomainWriter, DotRenderer, GeoJsonLoader};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// BoogieScape 景观空间表示调整工具
#[derive(Parser)]
#[command(name = "bs_cli")]
#[command(author = "BoogieScape-RS Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tool for adjusting spatial representations of agricultural landscapes", long_about = None)]
struct Cli {
    /// 输入目录（包含 RS/SU/RE GeoJSON 图层）
    input_path: PathBuf,

    /// 输出目录
    output_path: PathBuf,

    /// 输出目录已存在时覆盖
    #[arg(long)]
    overwrite: bool,

    /// 额外导出流向图 DOT 可视化
    #[arg(long)]
    export_graph_view: bool,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 运行工作区准备
    workspace::check_input_dir(&cli.input_path)?;
    workspace::prepare_output_dir(&cli.output_path, cli.overwrite)?;

    // 协作者装配：每次运行构造一次，按引用传入管线
    let loader = GeoJsonLoader::new(&cli.input_path);
    let writer = DomainWriter::new(&cli.output_path);
    let renderer = DotRenderer::new(&cli.output_path);

    let mut pipeline = Pipeline::new(&loader, &writer);
    if cli.export_graph_view {
        pipeline = pipeline.with_renderer(&renderer);
    }

    let report = pipeline.run()?;

    info!(
        rs = report.rs_loaded,
        su = report.su_loaded,
        re = report.re_loaded,
        ap = report.ap_created,
        gu = report.gu_created,
        "运行完成"
    );

    Ok(())
}
