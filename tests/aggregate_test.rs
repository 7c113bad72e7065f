#[cfg(test)]
mod tests {
    use arrow::array::{ArrayRef, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;
    use survey_charts::{ChartConfig, SurveyChartError, count_tables, join_tables};

    /// Build a primary batch with (resp_id, salary, gender) rows; the other
    /// demographic columns are present but null.
    fn primary_batch(rows: &[(&str, Option<&str>, Option<&str>)]) -> RecordBatch {
        let config = ChartConfig::default();
        let mut fields = vec![
            Field::new("resp_id", DataType::Utf8, false),
            Field::new("salary", DataType::Utf8, true),
        ];
        for spec in &config.single_categories {
            fields.push(Field::new(spec.name, DataType::Utf8, true));
        }
        let schema = Arc::new(Schema::new(fields));

        let ids: Vec<Option<&str>> = rows.iter().map(|r| Some(r.0)).collect();
        let salaries: Vec<Option<&str>> = rows.iter().map(|r| r.1).collect();
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(salaries)),
        ];
        for spec in &config.single_categories {
            let values: Vec<Option<&str>> = if spec.name == "gender" {
                rows.iter().map(|r| r.2).collect()
            } else {
                rows.iter().map(|_| None).collect()
            };
            columns.push(Arc::new(StringArray::from(values)));
        }
        RecordBatch::try_new(schema, columns).unwrap()
    }

    /// Build a side table with one row per (resp_id, value) pair
    fn side_batch(value_column: &str, rows: &[(&str, Option<&str>)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("resp_id", DataType::Utf8, false),
            Field::new(value_column, DataType::Utf8, true),
        ]));
        let ids: Vec<Option<&str>> = rows.iter().map(|r| Some(r.0)).collect();
        let values: Vec<Option<&str>> = rows.iter().map(|r| r.1).collect();
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(values)),
            ],
        )
        .unwrap()
    }

    fn empty_sides(config: &ChartConfig) -> Vec<RecordBatch> {
        config
            .multi_categories
            .iter()
            .map(|spec| side_batch(spec.name, &[]))
            .collect()
    }

    #[test]
    fn test_gender_scenario_counts_distinct_respondents() {
        let config = ChartConfig::default();
        let primary = primary_batch(&[
            ("1", Some("15K or less"), Some("M")),
            ("2", Some("25K+ to 35K"), Some("F")),
            ("3", Some("15K or less"), None),
        ]);
        let sides = empty_sides(&config);
        let side_refs: Vec<_> = config
            .multi_categories
            .iter()
            .zip(&sides)
            .map(|(spec, batch)| (*spec, batch))
            .collect();

        let respondents = join_tables(&primary, &side_refs, &config).unwrap();
        assert_eq!(respondents.len(), 3);

        let tables = count_tables(
            &respondents,
            &config.single_categories,
            &config.salary_order,
        );
        let gender = tables.iter().find(|t| t.category == "gender").unwrap();

        // The respondent with a missing gender is excluded
        assert_eq!(gender.rows.len(), 2);
        assert_eq!(
            (
                gender.rows[0].salary.as_str(),
                gender.rows[0].value.as_str(),
                gender.rows[0].count
            ),
            ("15K or less", "M", 1)
        );
        assert_eq!(
            (
                gender.rows[1].salary.as_str(),
                gender.rows[1].value.as_str(),
                gender.rows[1].count
            ),
            ("25K+ to 35K", "F", 1)
        );
    }

    #[test]
    fn test_two_tool_mentions_exceed_respondent_count() {
        let config = ChartConfig::default();
        let primary = primary_batch(&[("1", Some("35K+ to 45K"), None)]);
        let generaltools = side_batch("generaltools", &[]);
        let whatused = side_batch(
            "whatused",
            &[("1", Some("Python")), ("1", Some("SQL"))],
        );
        let sides = [
            (config.multi_categories[0], &generaltools),
            (config.multi_categories[1], &whatused),
        ];

        let respondents = join_tables(&primary, &sides, &config).unwrap();
        let tables = count_tables(&respondents, &config.multi_categories, &config.salary_order);
        let whatused = tables.iter().find(|t| t.category == "whatused").unwrap();

        let total: u64 = whatused
            .rows
            .iter()
            .filter(|r| r.salary == "35K+ to 45K")
            .map(|r| r.count)
            .sum();
        assert!(whatused.rows.iter().all(|r| r.count >= 1));
        assert!(total >= 2);
        assert_eq!(whatused.distinct_values(), vec!["Python", "SQL"]);
    }

    #[test]
    fn test_mentions_not_multiplied_by_other_side_table() {
        // Two whatused rows and three generaltools rows for one respondent:
        // whatused mentions must stay 2, not 2 * 3
        let config = ChartConfig::default();
        let primary = primary_batch(&[("1", Some("45K+ to 55K"), None)]);
        let generaltools = side_batch(
            "generaltools",
            &[("1", Some("Excel")), ("1", Some("Tableau")), ("1", Some("R"))],
        );
        let whatused = side_batch(
            "whatused",
            &[("1", Some("Python")), ("1", Some("SQL"))],
        );
        let sides = [
            (config.multi_categories[0], &generaltools),
            (config.multi_categories[1], &whatused),
        ];

        let respondents = join_tables(&primary, &sides, &config).unwrap();
        let tables = count_tables(&respondents, &config.multi_categories, &config.salary_order);

        let whatused_total: u64 = tables
            .iter()
            .find(|t| t.category == "whatused")
            .unwrap()
            .rows
            .iter()
            .map(|r| r.count)
            .sum();
        let generaltools_total: u64 = tables
            .iter()
            .find(|t| t.category == "generaltools")
            .unwrap()
            .rows
            .iter()
            .map(|r| r.count)
            .sum();
        assert_eq!(whatused_total, 2);
        assert_eq!(generaltools_total, 3);
    }

    #[test]
    fn test_left_join_keeps_primary_and_drops_unmatched_side_rows() {
        let config = ChartConfig::default();
        let primary = primary_batch(&[("1", Some("15K or less"), Some("M"))]);
        let generaltools = side_batch("generaltools", &[]);
        // Respondent 99 is not in the primary table
        let whatused = side_batch("whatused", &[("99", Some("Python"))]);
        let sides = [
            (config.multi_categories[0], &generaltools),
            (config.multi_categories[1], &whatused),
        ];

        let respondents = join_tables(&primary, &sides, &config).unwrap();
        assert_eq!(respondents.len(), 1);

        let tables = count_tables(&respondents, &config.multi_categories, &config.salary_order);
        assert!(tables.iter().all(|t| t.rows.is_empty()));
    }

    #[test]
    fn test_missing_join_key_is_fatal() {
        let config = ChartConfig::default();
        let primary = primary_batch(&[("1", Some("15K or less"), Some("M"))]);
        let generaltools = side_batch("generaltools", &[]);
        // Side table without a resp_id column
        let schema = Arc::new(Schema::new(vec![Field::new(
            "whatused",
            DataType::Utf8,
            true,
        )]));
        let whatused = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec![Some("Python")])) as ArrayRef],
        )
        .unwrap();
        let sides = [
            (config.multi_categories[0], &generaltools),
            (config.multi_categories[1], &whatused),
        ];

        let err = join_tables(&primary, &sides, &config).unwrap_err();
        assert!(matches!(
            err,
            SurveyChartError::ColumnNotFound { ref column, .. } if column == "resp_id"
        ));
    }

    #[test]
    fn test_missing_salary_column_is_fatal() {
        let config = ChartConfig::default();
        // Primary table without a salary column
        let mut fields = vec![Field::new("resp_id", DataType::Utf8, false)];
        for spec in &config.single_categories {
            fields.push(Field::new(spec.name, DataType::Utf8, true));
        }
        let schema = Arc::new(Schema::new(fields));
        let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(vec![Some("1")]))];
        for _ in &config.single_categories {
            columns.push(Arc::new(StringArray::from(vec![None::<&str>])));
        }
        let primary = RecordBatch::try_new(schema, columns).unwrap();

        let generaltools = side_batch("generaltools", &[]);
        let whatused = side_batch("whatused", &[]);
        let sides = [
            (config.multi_categories[0], &generaltools),
            (config.multi_categories[1], &whatused),
        ];

        let err = join_tables(&primary, &sides, &config).unwrap_err();
        assert!(matches!(
            err,
            SurveyChartError::ColumnNotFound { ref column, ref table }
                if column == "salary" && table == "primary"
        ));
    }
}
