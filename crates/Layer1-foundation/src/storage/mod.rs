//! Storage module
//!
//! - `workspace`: 파이프라인과 공유하는 입력/출력 파일

mod workspace;

pub use workspace::WorkspaceFiles;
