mod nse;

pub use nse::{NseAdapter, RawAudit, NSE_BASE_URL};
