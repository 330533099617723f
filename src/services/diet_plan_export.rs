use chrono::{ DateTime, Utc };

use crate::models::Meal;

pub const COLUMNS: [&str; 8] = [
    "Meal Time",
    "Food Items",
    "Portion Size",
    "Calories",
    "Protein(g)",
    "Carbs(g)",
    "Fats(g)",
    "Micronutrient Focus",
];

pub const HEADER_ACCENT_COLOR: &str = "#4CAF50";

pub const DEFAULT_ROWS_PER_PAGE: usize = 20;

const PROTEIN_GRAMS_PER_KG: f64 = 1.6;

pub type Row = [String; 8];

/// Recommended daily protein for the export header line.
pub fn recommended_protein_g(weight_kg: f64) -> f64 {
    weight_kg * PROTEIN_GRAMS_PER_KG
}

/// Cell text for a diet plan, one row per meal in plan order.
#[derive(Debug, Clone, PartialEq)]
pub struct DietPlanTable {
    rows: Vec<Row>,
}

impl DietPlanTable {
    pub fn from_meals(meals: &[Meal]) -> Self {
        let rows = meals
            .iter()
            .map(|meal| {
                [
                    meal.meal_time.clone(),
                    meal.food_items.clone(),
                    meal.portion_size.clone(),
                    meal.calories.to_string(),
                    meal.protein.to_string(),
                    meal.carbs.to_string(),
                    meal.fat.to_string(),
                    meal.micronutrient_focus.clone().unwrap_or_default(),
                ]
            })
            .collect();

        Self { rows }
    }

    /// Always at least one page, so an empty plan still prints its header.
    pub fn pages(&self, rows_per_page: usize) -> Vec<&[Row]> {
        if self.rows.is_empty() {
            return vec![&self.rows[..]];
        }
        self.rows.chunks(rows_per_page.max(1)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub title: String,
    pub rows_per_page: usize,
    pub generated_at: DateTime<Utc>,
    pub weight_kg: Option<f64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Personalized Diet Plan".to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            generated_at: Utc::now(),
            weight_kg: None,
        }
    }
}

/// Printable HTML document: one `.page` section per page, each repeating the header row.
pub fn render_html(table: &DietPlanTable, options: &ExportOptions) -> String {
    let pages = table.pages(options.rows_per_page);
    let total_pages = pages.len();
    let title = escape_html(&options.title);

    let header_cells: String = COLUMNS.iter()
        .map(|column| {
            format!(
                "<th style=\"background-color: {}; color: white; text-align: left;\">{}</th>",
                HEADER_ACCENT_COLOR,
                column
            )
        })
        .collect();

    let mut body = String::new();
    for (index, rows) in pages.iter().enumerate() {
        let page_number = index + 1;

        body.push_str(&format!("<section class=\"page\" data-page=\"{}\">\n", page_number));
        if index == 0 {
            body.push_str(&format!("<h1>{}</h1>\n", title));
            body.push_str(
                &format!(
                    "<p class=\"meta\">Generated {}</p>\n",
                    options.generated_at.format("%Y-%m-%d %H:%M UTC")
                )
            );
            if let Some(weight) = options.weight_kg {
                body.push_str(
                    &format!(
                        "<p class=\"meta\">Recommended protein intake: {:.0} g/day</p>\n",
                        recommended_protein_g(weight)
                    )
                );
            }
        }

        body.push_str("<table>\n<thead><tr>");
        body.push_str(&header_cells);
        body.push_str("</tr></thead>\n<tbody>\n");
        for row in rows.iter() {
            body.push_str("<tr>");
            for cell in row {
                body.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            body.push_str("</tr>\n");
        }
        body.push_str("</tbody>\n</table>\n");
        body.push_str(
            &format!("<p class=\"page-number\">Page {} of {}</p>\n", page_number, total_pages)
        );
        body.push_str("</section>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
    @page {{ size: A4 landscape; margin: 12mm; }}
    body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; color: #212121; }}
    h1 {{ color: #2E7D32; }}
    table {{ width: 100%; border-collapse: collapse; font-size: 0.9em; }}
    th, td {{ border: 1px solid #E0E0E0; padding: 6px 8px; vertical-align: top; }}
    thead {{ display: table-header-group; }}
    .meta {{ color: #757575; margin: 4px 0; }}
    .page {{ page-break-after: always; }}
    .page:last-child {{ page-break-after: auto; }}
    .page-number {{ text-align: right; color: #757575; font-size: 0.8em; }}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = title,
        body = body
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
