pub mod fx_service;
pub mod portfolio_service;
pub mod quote_service;
pub mod report_service;
pub mod search_service;
