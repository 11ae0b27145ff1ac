pub mod datafusion;

pub use self::datafusion::{DataFormat, DataFusionAdapter};
