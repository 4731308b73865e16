use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use tracing::{error, warn};

use crate::models::knowledge::KnowledgeEntry;
use crate::models::menu::{DatedMenu, MealSchedule, MealType, WeeklyTemplate};

/// Placeholder for a meal slot with neither a dated menu nor a template.
pub const NOT_SET: &str = "Not set";

/// Result of one table read. A failed read is logged and rendered as
/// "temporarily unavailable" in the prompt — it must not be conflated with
/// an empty table, and it never aborts the request.
#[derive(Debug)]
pub enum TableRead<T> {
    Loaded(Vec<T>),
    Failed,
}

impl<T> TableRead<T> {
    fn from_result(result: Result<Vec<T>, sqlx::Error>, table: &str) -> Self {
        match result {
            Ok(rows) => TableRead::Loaded(rows),
            Err(e) => {
                error!("Error reading {table}: {e}");
                TableRead::Failed
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            TableRead::Loaded(rows) => rows,
            TableRead::Failed => &[],
        }
    }

    pub fn failed(&self) -> bool {
        matches!(self, TableRead::Failed)
    }
}

/// Everything the prompt assembler needs, fetched in one pass.
#[derive(Debug)]
pub struct MenuContext {
    pub today: NaiveDate,
    pub end_date: NaiveDate,
    pub dated_menus: TableRead<DatedMenu>,
    pub templates: TableRead<WeeklyTemplate>,
    pub schedules: TableRead<MealSchedule>,
    pub knowledge: TableRead<KnowledgeEntry>,
}

pub struct MenuContextReader;

impl MenuContextReader {
    /// Fetch dated menus for [today, today + days_ahead], all weekly
    /// templates, active serving schedules and active FAQ entries. The four
    /// tables populate disjoint prompt sections, so the reads run
    /// concurrently.
    pub async fn fetch(pool: &PgPool, today: NaiveDate, days_ahead: i64) -> MenuContext {
        let end_date = today + Duration::days(days_ahead.clamp(0, 7));

        let dated = sqlx::query_as::<_, DatedMenu>(
            "SELECT id, date, meal_type, description, created_at, updated_at
             FROM dated_menus WHERE date BETWEEN $1 AND $2 ORDER BY date",
        )
        .bind(today)
        .bind(end_date)
        .fetch_all(pool);

        let templates = sqlx::query_as::<_, WeeklyTemplate>(
            "SELECT id, day_of_week, meal_type, main_dish, description, created_at, updated_at
             FROM weekly_menu_templates ORDER BY day_of_week",
        )
        .fetch_all(pool);

        let schedules = sqlx::query_as::<_, MealSchedule>(
            "SELECT id, meal_type, start_time, end_time, is_active, created_at
             FROM meal_schedules WHERE is_active = TRUE",
        )
        .fetch_all(pool);

        let knowledge = sqlx::query_as::<_, KnowledgeEntry>(
            "SELECT id, question, answer, category, is_active, created_at, updated_at
             FROM knowledge_base WHERE is_active = TRUE",
        )
        .fetch_all(pool);

        let (dated, templates, schedules, knowledge) =
            tokio::join!(dated, templates, schedules, knowledge);

        MenuContext {
            today,
            end_date,
            dated_menus: TableRead::from_result(dated, "dated_menus"),
            templates: TableRead::from_result(templates, "weekly_menu_templates"),
            schedules: TableRead::from_result(schedules, "meal_schedules"),
            knowledge: TableRead::from_result(knowledge, "knowledge_base"),
        }
    }
}

/// How a meal slot was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMeal {
    /// From a dated menu row for the exact date.
    Dated(String),
    /// From the weekly template for that weekday.
    Template(String),
    /// Neither a dated menu nor a template exists.
    NotSet,
}

impl ResolvedMeal {
    pub fn text(&self) -> &str {
        match self {
            ResolvedMeal::Dated(s) | ResolvedMeal::Template(s) => s,
            ResolvedMeal::NotSet => NOT_SET,
        }
    }
}

/// All three meal slots of one date after precedence resolution.
#[derive(Debug)]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub weekday: String,
    meals: [ResolvedMeal; 3],
}

impl ResolvedDay {
    pub fn meal(&self, meal_type: MealType) -> &ResolvedMeal {
        &self.meals[meal_type as usize]
    }
}

pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Template display text: main dish, plus " - description" when present.
fn template_text(t: &WeeklyTemplate) -> String {
    match t.description.as_deref().filter(|d| !d.is_empty()) {
        Some(desc) => format!("{} - {desc}", t.main_dish),
        None => t.main_dish.clone(),
    }
}

/// Three-tier lookup for one date: dated menu row wins, then the weekly
/// template for that weekday, then "Not set".
pub fn resolve_day(
    date: NaiveDate,
    dated_menus: &[DatedMenu],
    templates: &[WeeklyTemplate],
) -> ResolvedDay {
    let weekday = weekday_name(date);

    let meals = MealType::ALL.map(|meal_type| {
        if let Some(m) = dated_menus
            .iter()
            .find(|m| m.date == date && m.meal_type == meal_type)
        {
            return ResolvedMeal::Dated(m.description.clone());
        }

        let mut candidates = templates
            .iter()
            .filter(|t| t.day_of_week == weekday && t.meal_type == meal_type);

        match candidates.next() {
            Some(first) => {
                // The data layer enforces uniqueness per (weekday, meal_type);
                // a duplicate here means the constraint was bypassed.
                if candidates.next().is_some() {
                    warn!(
                        "Duplicate weekly template rows for {weekday}/{}; using the first",
                        first.meal_type.label()
                    );
                }
                ResolvedMeal::Template(template_text(first))
            }
            None => ResolvedMeal::NotSet,
        }
    });

    ResolvedDay {
        date,
        weekday,
        meals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn dated(date: NaiveDate, meal_type: MealType, description: &str) -> DatedMenu {
        DatedMenu {
            id: Uuid::new_v4(),
            date,
            meal_type,
            description: description.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn template(
        day_of_week: &str,
        meal_type: MealType,
        main_dish: &str,
        description: Option<&str>,
    ) -> WeeklyTemplate {
        WeeklyTemplate {
            id: Uuid::new_v4(),
            day_of_week: day_of_week.to_string(),
            meal_type,
            main_dish: main_dish.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // 2025-01-01 is a Wednesday.
    fn a_wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn dated_menu_beats_template() {
        let date = a_wednesday();
        let menus = vec![dated(date, MealType::Lunch, "Injera with shiro")];
        let templates = vec![template("Wednesday", MealType::Lunch, "Pasta", None)];

        let day = resolve_day(date, &menus, &templates);
        assert_eq!(
            day.meal(MealType::Lunch),
            &ResolvedMeal::Dated("Injera with shiro".to_string())
        );
    }

    #[test]
    fn template_fallback_includes_description() {
        let date = a_wednesday();
        let templates = vec![template(
            "Wednesday",
            MealType::Dinner,
            "Rice",
            Some("with vegetable stew"),
        )];

        let day = resolve_day(date, &[], &templates);
        assert_eq!(
            day.meal(MealType::Dinner),
            &ResolvedMeal::Template("Rice - with vegetable stew".to_string())
        );
    }

    #[test]
    fn template_fallback_without_description_is_main_dish_only() {
        let date = a_wednesday();
        let templates = vec![template("Wednesday", MealType::Breakfast, "Porridge", None)];

        let day = resolve_day(date, &[], &templates);
        assert_eq!(day.meal(MealType::Breakfast).text(), "Porridge");
    }

    #[test]
    fn missing_everywhere_is_not_set() {
        let day = resolve_day(a_wednesday(), &[], &[]);
        for meal_type in MealType::ALL {
            assert_eq!(day.meal(meal_type), &ResolvedMeal::NotSet);
            assert_eq!(day.meal(meal_type).text(), NOT_SET);
        }
    }

    #[test]
    fn wednesday_end_to_end_mix() {
        let date = a_wednesday();
        let menus = vec![dated(date, MealType::Lunch, "Rice and beans")];
        let templates = vec![template("Wednesday", MealType::Breakfast, "Pancakes", None)];

        let day = resolve_day(date, &menus, &templates);
        assert_eq!(day.weekday, "Wednesday");
        assert_eq!(day.meal(MealType::Breakfast).text(), "Pancakes");
        assert_eq!(day.meal(MealType::Lunch).text(), "Rice and beans");
        assert_eq!(day.meal(MealType::Dinner).text(), "Not set");
    }

    #[test]
    fn template_for_another_weekday_does_not_apply() {
        let date = a_wednesday();
        let templates = vec![template("Thursday", MealType::Lunch, "Soup", None)];

        let day = resolve_day(date, &[], &templates);
        assert_eq!(day.meal(MealType::Lunch), &ResolvedMeal::NotSet);
    }

    #[test]
    fn duplicate_templates_first_wins() {
        let date = a_wednesday();
        let templates = vec![
            template("Wednesday", MealType::Lunch, "First dish", None),
            template("Wednesday", MealType::Lunch, "Second dish", None),
        ];

        let day = resolve_day(date, &[], &templates);
        assert_eq!(day.meal(MealType::Lunch).text(), "First dish");
    }

    #[test]
    fn failed_read_exposes_empty_rows() {
        let read: TableRead<DatedMenu> = TableRead::Failed;
        assert!(read.failed());
        assert!(read.rows().is_empty());
    }
}
