pub mod assemble;
pub mod blocks;

mod export;
pub use export::ReportExportPanel;

mod view;
pub use view::ReportPanel;
