use std::io::{self, Write};

use crate::recipe::{NutritionError, Recipe};

struct Row<'a> {
    key: f64,
    lead: f64,
    density: f64,
    servings: f64,
    slug: &'a str,
}

fn write_sorted<'a, W: Write>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
    mut out: W,
    row: impl Fn(&'a Recipe) -> Result<Row<'a>, NutritionError>,
) -> io::Result<()> {
    let mut rows: Vec<_> = recipes.into_iter()
        // throw away cocktails
        .filter(|r| !r.is_drink())
        .filter_map(|r| row(r)
            .inspect_err(|err| tracing::warn!("leaving out of report: {err}"))
            .ok()
        )
    .collect();
    rows.sort_by(|a, b| b.key.total_cmp(&a.key));

    for r in rows {
        writeln!(out, "{:6.0} {:5.0} {:4.1} {}", r.lead, r.density, r.servings, r.slug)?;
    }
    Ok(())
}

/// Calories, calorie density, servings and slug, densest first.
pub fn write_calorie_density_report<'a, W: Write>(
    recipes: impl IntoIterator<Item = &'a Recipe>, out: W,
) -> io::Result<()> {
    write_sorted(recipes, out, |r| {
        let density = r.calorie_density()?;
        Ok(Row {
            key: density,
            lead: r.calories()?,
            density,
            servings: r.servings(),
            slug: r.slug(),
        })
    })
}

/// Saturated fat per serving, calorie density, servings and slug.
pub fn write_sat_fat_report<'a, W: Write>(
    recipes: impl IntoIterator<Item = &'a Recipe>, out: W,
) -> io::Result<()> {
    write_sorted(recipes, out, |r| {
        let sat_fat = r.saturated_fat_per_serving()?;
        Ok(Row {
            key: sat_fat,
            lead: sat_fat,
            density: r.calorie_density()?,
            servings: r.servings(),
            slug: r.slug(),
        })
    })
}

pub fn print_calorie_density_sorted<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
) -> io::Result<()> {
    write_calorie_density_report(recipes, io::stdout().lock())
}

pub fn print_sat_fat_per_serving_sorted<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
) -> io::Result<()> {
    write_sat_fat_report(recipes, io::stdout().lock())
}
