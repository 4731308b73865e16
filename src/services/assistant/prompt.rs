use chrono::NaiveTime;

use crate::models::menu::MealType;

use super::context::{resolve_day, weekday_name, MenuContext, ResolvedDay};

const DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const UNAVAILABLE: &str = "This data is temporarily unavailable. Let the student know and suggest checking with staff.";

/// Render the full system instruction from the fetched context. Pure string
/// formatting — all precedence decisions happen in the resolver.
pub fn build_system_prompt(ctx: &MenuContext) -> String {
    let weekday = weekday_name(ctx.today);

    let mut prompt = format!(
        "You are Campus Buddy, the official assistant for the school's meal management system.\n\
         You have access to live data from the school's database. Always use this data to answer questions accurately.\n\n\
         === CURRENT DATE CONTEXT ===\n\
         Current Date: {today}\n\
         Current Day: {weekday}\n\
         Date Range Available: {today} to {end}\n",
        today = ctx.today,
        end = ctx.end_date,
    );

    prompt.push_str(&today_section(ctx));
    prompt.push_str(&upcoming_section(ctx));
    prompt.push_str(&template_section(ctx));
    prompt.push_str(&schedule_section(ctx));
    prompt.push_str(&faq_section(ctx));
    prompt.push_str(RULES);

    prompt
}

fn render_day_meals(day: &ResolvedDay, out: &mut String) {
    for meal_type in MealType::ALL {
        out.push_str(&format!(
            "  - {}: {}\n",
            meal_type.label(),
            day.meal(meal_type).text()
        ));
    }
}

fn today_section(ctx: &MenuContext) -> String {
    let mut out = format!(
        "\n=== TODAY'S MENU ({} - {}) ===\n",
        ctx.today,
        weekday_name(ctx.today)
    );

    if ctx.dated_menus.failed() && ctx.templates.failed() {
        out.push_str(UNAVAILABLE);
        out.push('\n');
        return out;
    }

    let day = resolve_day(ctx.today, ctx.dated_menus.rows(), ctx.templates.rows());
    render_day_meals(&day, &mut out);

    if ctx.dated_menus.failed() || ctx.templates.failed() {
        out.push_str("NOTE: part of the menu data could not be loaded; entries above may be incomplete.\n");
    }
    out
}

fn upcoming_section(ctx: &MenuContext) -> String {
    let mut out = String::from("\n=== UPCOMING MENUS ===\n");

    if ctx.dated_menus.failed() {
        out.push_str(UNAVAILABLE);
        out.push('\n');
        return out;
    }

    let mut dates: Vec<_> = ctx.dated_menus.rows().iter().map(|m| m.date).collect();
    dates.sort();
    dates.dedup();
    dates.retain(|d| *d != ctx.today);

    if dates.is_empty() {
        out.push_str("No specific menus have been set for the upcoming week.\n");
        return out;
    }

    for date in dates {
        let day = resolve_day(date, ctx.dated_menus.rows(), ctx.templates.rows());
        out.push_str(&format!("\n{} ({}):\n", day.weekday, date));
        render_day_meals(&day, &mut out);
    }
    out
}

fn template_section(ctx: &MenuContext) -> String {
    let mut out = String::from("\n=== WEEKLY TEMPLATE (Default Pattern) ===\n");

    if ctx.templates.failed() {
        out.push_str(UNAVAILABLE);
        out.push('\n');
        return out;
    }

    let templates = ctx.templates.rows();
    if templates.is_empty() {
        out.push_str("No weekly templates have been configured.\n");
        return out;
    }

    out.push_str("Use this if no specific menu is set for a date:\n");
    for day in DAY_ORDER {
        let day_rows: Vec<_> = templates.iter().filter(|t| t.day_of_week == day).collect();
        if day_rows.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{day}:\n"));
        for meal_type in MealType::ALL {
            let text = day_rows
                .iter()
                .find(|t| t.meal_type == meal_type)
                .map(|t| match t.description.as_deref().filter(|d| !d.is_empty()) {
                    Some(desc) => format!("{} - {desc}", t.main_dish),
                    None => t.main_dish.clone(),
                })
                .unwrap_or_else(|| "Not set".to_string());
            out.push_str(&format!("  - {}: {}\n", meal_type.label(), text));
        }
    }
    out
}

fn schedule_section(ctx: &MenuContext) -> String {
    let mut out = String::from("\n=== MEAL SERVING TIMES ===\n");

    if ctx.schedules.failed() {
        out.push_str(UNAVAILABLE);
        out.push('\n');
        return out;
    }

    let schedules = ctx.schedules.rows();
    if schedules.is_empty() {
        out.push_str("No active schedules found.\n");
        return out;
    }

    for meal_type in MealType::ALL {
        let window = schedules
            .iter()
            .find(|s| s.meal_type == meal_type)
            .map(|s| format!("{} - {}", format_time_12h(s.start_time), format_time_12h(s.end_time)))
            .unwrap_or_else(|| "Not scheduled".to_string());
        out.push_str(&format!("- {}: {}\n", meal_type.label(), window));
    }
    out
}

fn faq_section(ctx: &MenuContext) -> String {
    if ctx.knowledge.failed() {
        return format!("\n=== FAQs ===\n{UNAVAILABLE}\n");
    }

    let entries = ctx.knowledge.rows();
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n=== FAQs ===\n");
    for entry in entries {
        out.push_str(&format!("\nQ: {}\nA: {}\n", entry.question, entry.answer));
    }
    out
}

const RULES: &str = "\n=== IMPORTANT RULES ===\n\
- NEVER guess or make up menu items - only use the data provided above\n\
- For future dates: check UPCOMING MENUS first, then fall back to the WEEKLY TEMPLATE for that day of week\n\
- For FAQs, use the exact answers provided above when available\n\
- If asked about a date beyond the available range, explain you only have access to the next week's data\n\
- If no menu is set, honestly tell the student and suggest they check with staff\n\
- For questions outside your knowledge, suggest contacting school administration\n\
- Be friendly, helpful, and concise\n";

/// "07:30:00" as 12-hour clock: "7:30 AM".
pub fn format_time_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu::{DatedMenu, WeeklyTemplate};
    use crate::services::assistant::context::TableRead;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn ctx_with(
        dated_menus: TableRead<DatedMenu>,
        templates: TableRead<WeeklyTemplate>,
    ) -> MenuContext {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(); // a Wednesday
        MenuContext {
            today,
            end_date: today + chrono::Duration::days(7),
            dated_menus,
            templates,
            schedules: TableRead::Loaded(vec![]),
            knowledge: TableRead::Loaded(vec![]),
        }
    }

    #[test]
    fn prompt_contains_fixed_sections() {
        let ctx = ctx_with(TableRead::Loaded(vec![]), TableRead::Loaded(vec![]));
        let prompt = build_system_prompt(&ctx);

        assert!(prompt.contains("=== CURRENT DATE CONTEXT ==="));
        assert!(prompt.contains("=== TODAY'S MENU"));
        assert!(prompt.contains("=== UPCOMING MENUS ==="));
        assert!(prompt.contains("=== WEEKLY TEMPLATE"));
        assert!(prompt.contains("=== MEAL SERVING TIMES ==="));
        assert!(prompt.contains("=== IMPORTANT RULES ==="));
        // Empty FAQ table renders no FAQ section at all.
        assert!(!prompt.contains("=== FAQs ==="));
    }

    #[test]
    fn empty_tables_render_not_set_today() {
        let ctx = ctx_with(TableRead::Loaded(vec![]), TableRead::Loaded(vec![]));
        let prompt = build_system_prompt(&ctx);
        assert!(prompt.contains("- Breakfast: Not set"));
    }

    #[test]
    fn failed_reads_are_marked_unavailable_not_not_set() {
        let ctx = ctx_with(TableRead::Failed, TableRead::Failed);
        let prompt = build_system_prompt(&ctx);

        let today_section = prompt
            .split("=== TODAY'S MENU")
            .nth(1)
            .and_then(|rest| rest.split("=== UPCOMING").next())
            .unwrap();
        assert!(today_section.contains("temporarily unavailable"));
        assert!(!today_section.contains("Not set"));
    }

    #[test]
    fn dated_menu_shows_up_in_today_section() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let menus = vec![DatedMenu {
            id: Uuid::new_v4(),
            date: today,
            meal_type: crate::models::menu::MealType::Lunch,
            description: "Rice and beans".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];
        let ctx = ctx_with(TableRead::Loaded(menus), TableRead::Loaded(vec![]));
        let prompt = build_system_prompt(&ctx);
        assert!(prompt.contains("- Lunch: Rice and beans"));
    }

    #[test]
    fn twelve_hour_formatting() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(format_time_12h(t(7, 0)), "7:00 AM");
        assert_eq!(format_time_12h(t(12, 30)), "12:30 PM");
        assert_eq!(format_time_12h(t(0, 15)), "12:15 AM");
        assert_eq!(format_time_12h(t(18, 5)), "6:05 PM");
    }
}
