pub mod feature_row;
pub mod forecast;
pub mod season;
pub mod stranding_record;
pub mod weather_query;
