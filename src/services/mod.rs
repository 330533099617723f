pub mod diet_plan_export;
pub mod food_lookup;
pub mod gemini_service;
pub mod generation_client;
pub mod ninja_service;
pub mod prompt_renderer;
pub mod tools;
