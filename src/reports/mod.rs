// Reports module - date alignment, daily resampling, rolling returns and CSV rendering

pub mod aligned;
pub mod export;
pub mod returns;

pub use aligned::{align, AlignedTable};
pub use export::{read_csv, to_csv_string, write_csv, write_csv_with_decimals};
pub use returns::{resample_daily, rolling_returns};
