use sqlx::PgPool;

/// Tables the admin may export. `users` is deliberately absent: password
/// hashes never leave the database.
pub const EXPORTABLE_TABLES: [&str; 7] = [
    "students",
    "staff",
    "meal_checkins",
    "dated_menus",
    "weekly_menu_templates",
    "meal_ratings",
    "knowledge_base",
];

pub struct BackupService;

impl BackupService {
    /// All rows of one allow-listed table as a JSON array. The table name is
    /// validated against the allow-list before being spliced into the query.
    pub async fn export_table(pool: &PgPool, table: &str) -> anyhow::Result<serde_json::Value> {
        if !EXPORTABLE_TABLES.contains(&table) {
            anyhow::bail!("Table not exportable: {table}");
        }

        let rows: serde_json::Value = sqlx::query_scalar(&format!(
            "SELECT COALESCE(jsonb_agg(to_jsonb(t) ORDER BY t.created_at), '[]'::jsonb)
             FROM {table} t"
        ))
        .fetch_one(pool)
        .await?;
        Ok(rows)
    }

    /// One JSON document holding every exportable table.
    pub async fn export_all(pool: &PgPool) -> anyhow::Result<serde_json::Value> {
        let mut out = serde_json::Map::new();
        for table in EXPORTABLE_TABLES {
            out.insert(table.to_string(), Self::export_table(pool, table).await?);
        }
        Ok(serde_json::Value::Object(out))
    }
}

/// Flatten a JSON array of flat objects into CSV. Columns come from the
/// first row's keys; nested values are serialized inline.
pub fn json_rows_to_csv(rows: &serde_json::Value) -> anyhow::Result<String> {
    let rows = rows
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Expected a JSON array"))?;

    let mut writer = csv::Writer::from_writer(Vec::new());

    let Some(first) = rows.first().and_then(|r| r.as_object()) else {
        return Ok(String::new());
    };
    let columns: Vec<&String> = first.keys().collect();
    writer.write_record(&columns)?;

    for row in rows {
        let obj = row
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Expected JSON objects in array"))?;
        let record: Vec<String> = columns
            .iter()
            .map(|col| match obj.get(*col) {
                None | Some(serde_json::Value::Null) => String::new(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_has_header_from_first_row() {
        let rows = json!([
            { "student_id": "IFB-0001", "full_name": "Abebe", "grade": "9" },
            { "student_id": "IFB-0002", "full_name": "Chaltu", "grade": "10" },
        ]);
        let csv = json_rows_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("full_name,grade,student_id"));
        assert_eq!(lines.next(), Some("Abebe,9,IFB-0001"));
        assert_eq!(lines.next(), Some("Chaltu,10,IFB-0002"));
    }

    #[test]
    fn nulls_become_empty_cells() {
        let rows = json!([{ "a": null, "b": 3 }]);
        let csv = json_rows_to_csv(&rows).unwrap();
        assert_eq!(csv.lines().nth(1), Some(",3"));
    }

    #[test]
    fn empty_array_yields_empty_output() {
        assert_eq!(json_rows_to_csv(&json!([])).unwrap(), "");
    }

    #[test]
    fn non_array_input_is_an_error() {
        assert!(json_rows_to_csv(&json!({"not": "an array"})).is_err());
    }

    #[test]
    fn users_table_is_not_exportable() {
        assert!(!EXPORTABLE_TABLES.contains(&"users"));
    }
}
