//! Demo data seed script
//!
//! Seeds a fresh database with a realistic demo dataset:
//! - 1 admin, 1 kitchen staff member, 5 students (each with a login)
//! - A full week of menu templates (breakfast/lunch/dinner per weekday)
//! - Dated menus for today and tomorrow (overriding the templates)
//! - Serving times for all three meals
//! - A handful of FAQ entries and one announcement
//!
//! Usage:
//!   DATABASE_URL=... DEMO_PASSWORD=Demo2024! ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL   — PostgreSQL connection string (required)
//!   DEMO_PASSWORD  — Password for all demo accounts (default: Demo2024!)

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo2024!".to_string());

    println!("=== Seed Demo Data ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    // 1. Clean previous demo rows (demo accounts all live on example.school)
    println!("Cleaning previous demo data...");
    sqlx::query("DELETE FROM students WHERE student_id LIKE 'IFB-%'")
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM staff WHERE staff_id LIKE 'STF-%'")
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM users WHERE email LIKE '%@example.school'")
        .execute(&pool)
        .await?;
    for table in [
        "dated_menus",
        "weekly_menu_templates",
        "meal_schedules",
        "knowledge_base",
        "announcements",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&pool)
            .await?;
    }

    // 2. Users (cost 10 for seed speed)
    let password_hash =
        bcrypt::hash(&demo_password, 10).context("Failed to hash demo password")?;

    println!("Inserting admin and staff...");
    let admin_id = insert_user(&pool, "admin@example.school", "Meseret Alemu", "admin", &password_hash).await?;
    let staff_user_id = insert_user(&pool, "kitchen@example.school", "Tesfaye Bekele", "staff", &password_hash).await?;

    sqlx::query(
        "INSERT INTO staff (staff_id, user_id, full_name, position)
         VALUES ('STF-' || LPAD(nextval('staff_id_seq')::TEXT, 4, '0'), $1, $2, $3)",
    )
    .bind(staff_user_id)
    .bind("Tesfaye Bekele")
    .bind("Kitchen Supervisor")
    .execute(&pool)
    .await?;

    println!("Inserting students...");
    let students = [
        ("abebe@example.school", "Abebe Kebede", "9", "M"),
        ("chaltu@example.school", "Chaltu Gemechu", "10", "F"),
        ("hana@example.school", "Hana Tadesse", "11", "F"),
        ("dawit@example.school", "Dawit Girma", "9", "M"),
        ("sara@example.school", "Sara Mohammed", "12", "F"),
    ];
    for (email, name, grade, sex) in &students {
        let user_id = insert_user(&pool, email, name, "student", &password_hash).await?;
        sqlx::query(
            "INSERT INTO students (student_id, user_id, full_name, grade, sex)
             VALUES ('IFB-' || LPAD(nextval('student_id_seq')::TEXT, 4, '0'), $1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(name)
        .bind(grade)
        .bind(sex)
        .execute(&pool)
        .await?;
    }

    // 3. Weekly templates — every weekday, all three meals
    println!("Inserting weekly menu templates...");
    let days = [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ];
    let breakfasts = [
        "Porridge", "Bread and tea", "Pancakes", "Porridge", "Bread and eggs", "Kinche", "Pancakes",
    ];
    let lunches = [
        "Injera with shiro", "Rice and beans", "Pasta with vegetables", "Injera with lentils",
        "Rice with vegetable stew", "Injera with kik alicha", "Spaghetti with sauce",
    ];
    let dinners = [
        "Vegetable soup and bread", "Injera with misir wot", "Rice with cabbage",
        "Bread with bean stew", "Injera with shiro", "Vegetable rice", "Soup and bread",
    ];
    for (i, day) in days.iter().enumerate() {
        for (meal, dish) in [
            ("breakfast", breakfasts[i]),
            ("lunch", lunches[i]),
            ("dinner", dinners[i]),
        ] {
            sqlx::query(
                "INSERT INTO weekly_menu_templates (day_of_week, meal_type, main_dish, description)
                 VALUES ($1, $2::meal_type, $3, NULL)",
            )
            .bind(day)
            .bind(meal)
            .bind(dish)
            .execute(&pool)
            .await?;
        }
    }

    // 4. Dated menus for today and tomorrow
    println!("Inserting dated menus...");
    let today = Utc::now().date_naive();
    let dated = [
        (today, "lunch", "Special: doro wot with injera"),
        (today + Duration::days(1), "dinner", "Special: tibs with rice"),
    ];
    for (date, meal, description) in &dated {
        sqlx::query(
            "INSERT INTO dated_menus (date, meal_type, description)
             VALUES ($1, $2::meal_type, $3)",
        )
        .bind(date)
        .bind(meal)
        .bind(description)
        .execute(&pool)
        .await?;
    }

    // 5. Serving times
    println!("Inserting meal schedules...");
    for (meal, start, end) in [
        ("breakfast", "07:00", "08:00"),
        ("lunch", "12:00", "13:30"),
        ("dinner", "18:00", "19:30"),
    ] {
        sqlx::query(
            "INSERT INTO meal_schedules (meal_type, start_time, end_time)
             VALUES ($1::meal_type, $2::TIME, $3::TIME)",
        )
        .bind(meal)
        .bind(start)
        .bind(end)
        .execute(&pool)
        .await?;
    }

    // 6. FAQs
    println!("Inserting knowledge base entries...");
    let faqs = [
        (
            "Can I get a second serving?",
            "Second servings are available after all students have been served, usually 15 minutes before the end of the meal window.",
            "meals",
        ),
        (
            "What if I miss a meal?",
            "Talk to the kitchen staff before the meal window closes. Late plates are kept for students with a class conflict.",
            "meals",
        ),
        (
            "Who do I contact about dietary restrictions?",
            "The kitchen supervisor keeps the dietary list. Ask any staff member to add you.",
            "general",
        ),
    ];
    for (question, answer, category) in &faqs {
        sqlx::query(
            "INSERT INTO knowledge_base (question, answer, category) VALUES ($1, $2, $3)",
        )
        .bind(question)
        .bind(answer)
        .bind(category)
        .execute(&pool)
        .await?;
    }

    // 7. Announcement
    sqlx::query(
        "INSERT INTO announcements (title, content, created_by) VALUES ($1, $2, $3)",
    )
    .bind("Welcome to the new meal system")
    .bind("Check-ins now use your QR code. Show it to the staff at the serving line.")
    .bind(admin_id)
    .execute(&pool)
    .await?;

    println!("Done.");
    println!("  Admin:   admin@example.school / {demo_password}");
    println!("  Staff:   kitchen@example.school / {demo_password}");
    println!("  Student: abebe@example.school / {demo_password}");

    Ok(())
}

async fn insert_user(
    pool: &PgPool,
    email: &str,
    full_name: &str,
    role: &str,
    password_hash: &str,
) -> Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, full_name, role)
         VALUES ($1, $2, $3, $4::user_role) RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Failed to insert user {email}"))?;
    Ok(id)
}
