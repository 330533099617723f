pub mod analyze_food_image;
pub mod generate_diet_plan;

pub use analyze_food_image::AnalyzeFoodImageFlow;
pub use generate_diet_plan::GenerateDietPlanFlow;
