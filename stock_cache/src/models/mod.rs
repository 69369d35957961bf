pub mod observation;
pub mod period;
pub mod request_params;
pub mod stock_series;
pub mod ticker;
