pub mod diet_plan;
pub mod food_analysis;
pub mod food_search;
pub mod status;
