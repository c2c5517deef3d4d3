pub mod graphics;
pub mod reader;
pub mod renderer;

pub use graphics::{GraphicsBridge, PageGraphics};
pub use reader::{find_exam_pdfs, parse_year_range, ExamPdf, PdfReader};
pub use renderer::PageRenderer;
