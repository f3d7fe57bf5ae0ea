pub mod category_filter;
pub mod retailer_filter;
pub mod search_text_filter;
pub mod stock_status_filter;
