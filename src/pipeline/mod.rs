pub mod generator;
pub mod layout;
pub mod orchestrator;
pub mod registry;
pub mod report;

pub use generator::{Generator, GeneratorInvocation, ProcessGenerator};
pub use layout::Layout;
pub use orchestrator::Pipeline;
pub use registry::{ArtifactCategory, Package, PackageRegistry};
pub use report::{GeneratorReport, PackageReport, RunReport, Stage};
