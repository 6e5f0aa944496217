//! Prompt construction for every backend call.
//!
//! The large analysis template lives in `analysis_prompt.txt` and is
//! embedded at compile time, keeping the wording editable without
//! touching Rust string syntax.

use crate::model::{AnalysisReport, IngredientList, SkinProfile, TimeOfDay};

/// Grounded analysis request template.
pub const ANALYSIS_PROMPT: &str = include_str!("analysis_prompt.txt");

/// System role shared by the analysis and comparison calls.
pub const ANALYST_SYSTEM_ROLE: &str = "You are a cosmetic chemist. Analyze ALL ingredients. \
     Output ONLY valid JSON without any additional text.";

/// Strict classification rules for the router's LLM path.
pub const CLASSIFIER_SYSTEM_ROLE: &str = r#"You are a skincare product analyzer. Strictly follow these rules:
1. Analyze if the text contains a product name, ingredients, or both
2. If the text contains BOTH a product name and ingredients:
   - Return ONLY the product name (type=product)
   - Ignore all ingredients
3. If the text contains ONLY ingredients:
   - Return the cleaned ingredients list (type=ingredients)
4. If the text contains ONLY a product name:
   - Return the product name (type=product)
5. The response MUST be JSON with EXACTLY these fields:
   {
     "type": "product" OR "ingredients" (NO other values),
     "product_name": "..." (ONLY if type=product),
     "ingredients": "..." (ONLY if type=ingredients)
   }
6. For product names, extract ONLY the brand+product name (no sizes, descriptions, etc.)
7. For ingredients, return ONLY comma-separated ingredients (no percentages, numbers, etc.)"#;

/// Build the grounded analysis prompt for one ingredient list and profile.
pub fn build_analysis_prompt(ingredients: &IngredientList, profile: &SkinProfile) -> String {
    ANALYSIS_PROMPT
        .replace("{skin_type}", profile.skin_type_str())
        .replace("{concerns}", &profile.concerns_str())
        .replace("{count}", &ingredients.len().to_string())
        .replace("{ingredients}", &ingredients.joined())
}

/// Build the routine-generation prompt for one slot and profile.
pub fn build_routine_prompt(time_of_day: TimeOfDay, profile: &SkinProfile) -> String {
    let steps = match time_of_day {
        TimeOfDay::AM => "cleanser, toner, serum, moisturizer, sunscreen",
        TimeOfDay::PM => "oil cleanser, toner, treatment, eye cream, moisturizer",
    };

    format!(
        r#"You are an expert skincare formulator creating a personalized skincare routine.
Create a {time} routine for someone with {skin_type} skin and these concerns: {concerns}.
Typical {time} steps are: {steps}.

For each step, recommend a specific product.
Include the direct link to the OFFICIAL BRAND WEBSITE for each product (not third-party retailers).
Provide a short, one-sentence description of how the product helps with {skin_type} skin and {concerns} concerns.

Return ONLY valid JSON in this format:
{{
    "routine": [
        {{
            "step": "step name",
            "product": "Brand Product Name",
            "link": "https://brand.com",
            "description": "How this product helps."
        }}
    ]
}}"#,
        time = time_of_day.as_str(),
        skin_type = profile.skin_type_str(),
        concerns = profile.concerns_str(),
        steps = steps,
    )
}

/// Build the two-product comparison prompt.
pub fn build_comparison_prompt(
    report_a: &AnalysisReport,
    report_b: &AnalysisReport,
    profile: &SkinProfile,
) -> String {
    let analysis_a = serde_json::to_string(report_a).unwrap_or_default();
    let analysis_b = serde_json::to_string(report_b).unwrap_or_default();

    format!(
        "Compare these products for {skin_type} skin with concerns: {concerns}\n\n\
         PRODUCT 1 ANALYSIS:\n{analysis_a}\n\n\
         PRODUCT 2 ANALYSIS:\n{analysis_b}\n\n\
         Output the comparison in JSON format with these keys: \
         better_product (1 or 2), comparison_summary, key_differences",
        skin_type = profile.skin_type_str(),
        concerns = profile.concerns_str(),
    )
}
