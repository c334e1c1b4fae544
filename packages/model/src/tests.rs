//! Tests for the mood model
//!
//! Covers coercion, label encoding, dataset handling, training, artifact
//! persistence and the prediction pipeline.

#[cfg(test)]
mod tests {
    use crate::classifier::TreeParams;
    use crate::compare::compare_with_previous;
    use crate::dataset::TrainingTable;
    use crate::encoder::LabelEncoder;
    use crate::error::ErrorKind;
    use crate::feature::{FeatureRecord, FeatureValue};
    use crate::mood::mood_state;
    use crate::predict::PredictRequest;
    use crate::train::{TrainParams, train};
    use crate::{ArtifactFormat, MoodModel};
    use serde_json::{Value, json};

    const SAMPLE_CSV: &str = "\
sleep_hours,trained,mood,stress_level,water_liters,social_interaction,meditated,result
8,True,4,2,2.0,True,False,Stable
7,True,5,1,2.5,True,True,Stable
9,False,4,2,1.5,True,True,Stable
4,False,2,5,0.5,False,False,At Risk
5,False,1,4,1.0,False,False,At Risk
3,True,2,5,0.8,False,False,At Risk
6,False,3,3,1.2,True,False,Needs Attention
6,True,3,4,1.0,False,True,Needs Attention
5,True,3,3,1.5,True,False,Needs Attention
";

    fn sample_params() -> TrainParams {
        TrainParams {
            target: "result".to_string(),
            bool_cols: vec![
                "trained".to_string(),
                "social_interaction".to_string(),
                "meditated".to_string(),
            ],
            tree: TreeParams::default(),
        }
    }

    fn sample_model() -> MoodModel {
        let table = TrainingTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let (model, _) = train(table, &sample_params()).unwrap();
        model
    }

    fn sample_request() -> Value {
        json!({
            "sleep_hours": 7,
            "trained": true,
            "mood": 4,
            "stress_level": 2,
            "water_liters": 2.0,
            "social_interaction": true,
            "meditated": false
        })
    }

    // ============================================================================
    // FeatureValue coercion tests
    // ============================================================================

    #[test]
    fn test_bool_coercion_is_format_invariant() {
        let forms = [
            FeatureValue::Bool(true),
            FeatureValue::Number(1.0),
            FeatureValue::Text("True".to_string()),
        ];
        for form in &forms {
            assert!(form.to_bool("trained").unwrap(), "{form:?}");
        }

        assert!(!FeatureValue::Text("False".to_string()).to_bool("trained").unwrap());
        assert!(!FeatureValue::Number(0.0).to_bool("trained").unwrap());
        assert!(FeatureValue::Number(2.0).to_bool("trained").unwrap());
    }

    #[test]
    fn test_bool_coercion_rejects_free_text() {
        let err = FeatureValue::Text("maybe".to_string())
            .to_bool("meditated")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);
        assert!(err.to_string().contains("meditated"));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(FeatureValue::Text(" 7.5 ".to_string()).to_f64("x").unwrap(), 7.5);
        assert_eq!(FeatureValue::Bool(true).to_f64("x").unwrap(), 1.0);
        assert_eq!(FeatureValue::Number(3.0).to_f64("x").unwrap(), 3.0);

        let err = FeatureValue::Text("lots".to_string()).to_f64("x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);
    }

    #[test]
    fn test_numeric_coercion_rejects_non_finite_text() {
        for text in ["NaN", "inf", "-infinity", " Infinity "] {
            let err = FeatureValue::Text(text.to_string())
                .to_f64("sleep_hours")
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeCoercion, "{text}");
        }
    }

    #[test]
    fn test_feature_record_skips_non_scalars() {
        let value = json!({"a": 1, "b": null, "c": [1, 2], "d": {"x": 1}, "e": "True"});
        let record = FeatureRecord::from_json_map(value.as_object().unwrap());

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&FeatureValue::Number(1.0)));
        assert_eq!(record.get("e"), Some(&FeatureValue::Text("True".to_string())));
        assert!(!record.contains("b"));
        assert_eq!(record.require("c").unwrap_err().kind(), ErrorKind::MissingFeature);
    }

    // ============================================================================
    // LabelEncoder tests
    // ============================================================================

    #[test]
    fn test_label_encoder_sorted_indices() {
        let encoder = LabelEncoder::fit(&["b", "a", "b", "c"]);
        assert_eq!(encoder.classes(), &["a", "b", "c"]);
        assert_eq!(encoder.transform("b").unwrap(), 1);
        assert_eq!(encoder.inverse_transform(2).unwrap(), "c");
    }

    #[test]
    fn test_label_encoder_is_order_independent() {
        let a = LabelEncoder::fit(&["x", "y", "z"]);
        let b = LabelEncoder::fit(&["z", "x", "y", "x"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_label_encoder_unknown_values() {
        let encoder = LabelEncoder::fit(&["a"]);
        assert!(encoder.transform("zzz").is_err());
        assert_eq!(
            encoder.inverse_transform(5).unwrap_err().kind(),
            ErrorKind::ModelInvocation
        );
    }

    // ============================================================================
    // Mood state tests
    // ============================================================================

    #[test]
    fn test_mood_state_lookup() {
        assert_eq!(mood_state(1), "Bad mental state");
        assert_eq!(mood_state(2), "Struggling");
        assert_eq!(mood_state(3), "Balanced");
        assert_eq!(mood_state(4), "Positive");
        assert_eq!(mood_state(5), "Cheerful");
        assert_eq!(mood_state(0), "Unknown");
        assert_eq!(mood_state(6), "Unknown");
        assert_eq!(mood_state(-1), "Unknown");
    }

    // ============================================================================
    // Comparison tests
    // ============================================================================

    #[test]
    fn test_compare_started_exercise() {
        let current = FeatureRecord::new().with("trained", true);
        let previous = FeatureRecord::new().with("trained", false);
        assert_eq!(
            compare_with_previous(&current, &previous).unwrap(),
            vec!["Started exercise"]
        );
    }

    #[test]
    fn test_compare_no_stopped_message() {
        let current = FeatureRecord::new().with("trained", false);
        let previous = FeatureRecord::new().with("trained", true);
        assert!(compare_with_previous(&current, &previous).unwrap().is_empty());
    }

    #[test]
    fn test_compare_numeric_changes() {
        let eight = FeatureRecord::new().with("sleep_hours", 8i64);
        let six = FeatureRecord::new().with("sleep_hours", 6i64);

        assert_eq!(compare_with_previous(&eight, &six).unwrap(), vec!["Increased sleep"]);
        assert_eq!(compare_with_previous(&six, &eight).unwrap(), vec!["Decreased sleep"]);
        assert!(compare_with_previous(&six, &six).unwrap().is_empty());
    }

    #[test]
    fn test_compare_follows_factor_table_order() {
        let current = FeatureRecord::new()
            .with("social_interaction", true)
            .with("water_liters", 1.0)
            .with("sleep_hours", 8i64);
        let previous = FeatureRecord::new()
            .with("social_interaction", false)
            .with("water_liters", 2.0)
            .with("sleep_hours", 6i64);

        assert_eq!(
            compare_with_previous(&current, &previous).unwrap(),
            vec![
                "Increased sleep",
                "Decreased water intake",
                "Started social interaction"
            ]
        );
    }

    #[test]
    fn test_compare_skips_factors_missing_on_either_side() {
        let current = FeatureRecord::new()
            .with("meditated", true)
            .with("sleep_hours", 9i64);
        let previous = FeatureRecord::new().with("stress_level", 3i64);
        assert!(compare_with_previous(&current, &previous).unwrap().is_empty());
    }

    #[test]
    fn test_compare_reads_stored_flags_as_numbers() {
        // stored logs keep booleans as 0/1
        let current = FeatureRecord::new().with("meditated", true);
        let previous = FeatureRecord::new().with("meditated", 0i64);
        assert_eq!(
            compare_with_previous(&current, &previous).unwrap(),
            vec!["Started meditation"]
        );
    }

    // ============================================================================
    // Dataset tests
    // ============================================================================

    #[test]
    fn test_csv_keeps_header_order() {
        let table = TrainingTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 9);
        assert_eq!(
            table.feature_names("result"),
            vec![
                "sleep_hours",
                "trained",
                "mood",
                "stress_level",
                "water_liters",
                "social_interaction",
                "meditated"
            ]
        );
    }

    #[test]
    fn test_missing_dataset_file() {
        let err = TrainingTable::from_csv_path("/definitely/not/here/data.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DatasetNotFound);
    }

    #[test]
    fn test_bool_normalization_rejects_other_values() {
        let csv = "trained,result\nyes,A\nFalse,B\n";
        let mut table = TrainingTable::from_csv_reader(csv.as_bytes()).unwrap();
        let err = table
            .normalize_bool_columns(&["trained".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dataset);
    }

    #[test]
    fn test_bool_normalization_accepts_native_and_text() {
        let rows = vec![
            json!({"trained": true, "result": "A"}),
            json!({"trained": "False", "result": "B"}),
            json!({"trained": "True", "result": "A"}),
        ];
        let mut table =
            TrainingTable::new(vec!["trained".to_string(), "result".to_string()], rows).unwrap();
        table
            .normalize_bool_columns(&["trained".to_string()])
            .unwrap();

        let array = table.records_to_array2(&["trained".to_string()]).unwrap();
        assert_eq!(array.column(0).to_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bool_normalization_accepts_digit_text() {
        let csv = "trained,result\n1,A\n0,B\nTRUE,A\n";
        let mut table = TrainingTable::from_csv_reader(csv.as_bytes()).unwrap();
        table
            .normalize_bool_columns(&["trained".to_string()])
            .unwrap();

        let array = table.records_to_array2(&["trained".to_string()]).unwrap();
        assert_eq!(array.column(0).to_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_records_to_array2_non_numeric_cell() {
        let csv = "sleep_hours,result\nlots,A\n";
        let table = TrainingTable::from_csv_reader(csv.as_bytes()).unwrap();
        let err = table
            .records_to_array2(&["sleep_hours".to_string()])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dataset);
    }

    // ============================================================================
    // Training tests
    // ============================================================================

    #[test]
    fn test_train_records_schema() {
        let table = TrainingTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let (model, report) = train(table, &sample_params()).unwrap();

        assert_eq!(model.feature_names().len(), 7);
        assert_eq!(model.feature_names()[0], "sleep_hours");
        assert_eq!(model.bool_cols(), &["trained", "social_interaction", "meditated"]);
        assert_eq!(
            model.label_encoder().classes(),
            &["At Risk", "Needs Attention", "Stable"]
        );
        assert_eq!(report.n_samples, 9);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!(report.leaves >= 1);
    }

    #[test]
    fn test_train_missing_target() {
        let mut params = sample_params();
        params.target = "outcome".to_string();
        let table = TrainingTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let err = train(table, &params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dataset);
    }

    #[test]
    fn test_train_empty_table() {
        let table = TrainingTable::from_csv_reader("a,result\n".as_bytes()).unwrap();
        assert!(train(table, &TrainParams::default()).is_err());
    }

    // ============================================================================
    // Prediction tests
    // ============================================================================

    #[test]
    fn test_predict_returns_known_label() {
        let model = sample_model();
        let request = PredictRequest::from_value(&sample_request()).unwrap();
        let result = model.predict(&request).unwrap();

        assert!(
            model
                .label_encoder()
                .classes()
                .contains(&result.prediction)
        );
        assert!((0.0..=1.0).contains(&result.confidence));
        assert_eq!(result.mood_level, 4);
        assert_eq!(result.mood_state, "Positive");
        assert!(result.improvements.is_none());
    }

    #[test]
    fn test_predict_on_training_rows_is_consistent() {
        let model = sample_model();
        let table = TrainingTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();

        for row in table.rows() {
            let request = PredictRequest::from_value(row).unwrap();
            let result = model.predict(&request).unwrap();
            assert!((0.0..=1.0).contains(&result.confidence));
            assert!(result.confidence > 0.0);
        }
    }

    #[test]
    fn test_predict_is_key_order_invariant() {
        let model = sample_model();
        let forward = serde_json::from_str::<Value>(
            r#"{"sleep_hours":6,"trained":false,"mood":3,"stress_level":3,
                "water_liters":1.2,"social_interaction":true,"meditated":false}"#,
        )
        .unwrap();
        let reversed = serde_json::from_str::<Value>(
            r#"{"meditated":false,"social_interaction":true,"water_liters":1.2,
                "stress_level":3,"mood":3,"trained":false,"sleep_hours":6}"#,
        )
        .unwrap();

        let a = model
            .predict(&PredictRequest::from_value(&forward).unwrap())
            .unwrap();
        let b = model
            .predict(&PredictRequest::from_value(&reversed).unwrap())
            .unwrap();
        assert_eq!(a.prediction, b.prediction);
        assert_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_align_bool_forms_are_identical() {
        let model = sample_model();
        let mut native = sample_request();
        let mut numeric = sample_request();
        let mut text = sample_request();
        native["trained"] = json!(true);
        numeric["trained"] = json!(1);
        text["trained"] = json!("True");

        let rows: Vec<_> = [native, numeric, text]
            .iter()
            .map(|v| {
                let request = PredictRequest::from_value(v).unwrap();
                model.align(&request.features).unwrap()
            })
            .collect();
        assert_eq!(rows[0], rows[1]);
        assert_eq!(rows[1], rows[2]);
        assert_eq!(rows[0][[0, 1]], 1.0);
    }

    #[test]
    fn test_predict_missing_feature() {
        let model = sample_model();
        let mut body = sample_request();
        body.as_object_mut().unwrap().remove("water_liters");

        let err = model
            .predict(&PredictRequest::from_value(&body).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingFeature);
        assert!(err.to_string().contains("water_liters"));
    }

    #[test]
    fn test_predict_default_mood_level() {
        let model = sample_model();
        let mut body = sample_request();
        body.as_object_mut().unwrap().remove("mood");

        // the sample model is trained on `mood`, so only the echo is checked
        let request = PredictRequest::from_value(&body).unwrap();
        assert_eq!(request.mood, None);
        let err = model.predict(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingFeature);

        let table = TrainingTable::from_csv_reader(
            "sleep_hours,trained,result\n8,True,A\n4,False,B\n".as_bytes(),
        )
        .unwrap();
        let params = TrainParams {
            bool_cols: vec!["trained".to_string()],
            ..TrainParams::default()
        };
        let (model, _) = train(table, &params).unwrap();
        let request =
            PredictRequest::from_value(&json!({"sleep_hours": 8, "trained": true})).unwrap();
        let result = model.predict(&request).unwrap();
        assert_eq!(result.mood_level, 3);
        assert_eq!(result.mood_state, "Balanced");
    }

    #[test]
    fn test_predict_with_previous_data() {
        let model = sample_model();
        let mut body = sample_request();
        body["previous_data"] = json!({"trained": false, "sleep_hours": 5, "id": 12});

        let result = model
            .predict(&PredictRequest::from_value(&body).unwrap())
            .unwrap();
        assert_eq!(
            result.improvements,
            Some(vec![
                "Increased sleep".to_string(),
                "Started exercise".to_string()
            ])
        );
    }

    #[test]
    fn test_predict_non_finite_numeric_text() {
        let model = sample_model();
        for text in ["NaN", "inf", "-infinity"] {
            let mut body = sample_request();
            body["sleep_hours"] = json!(text);

            let err = model
                .predict(&PredictRequest::from_value(&body).unwrap())
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeCoercion, "{text}");
            assert!(err.to_string().contains("sleep_hours"));
        }
    }

    #[test]
    fn test_request_mood_parsing() {
        let request = PredictRequest::from_value(&json!({"mood": 4.0})).unwrap();
        assert_eq!(request.mood, Some(4));

        let request = PredictRequest::from_value(&json!({"mood": 9})).unwrap();
        assert_eq!(request.mood, Some(9));

        let err = PredictRequest::from_value(&json!({"mood": "great"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);

        let err = PredictRequest::from_value(&json!({"mood": 2.5})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);
    }

    #[test]
    fn test_request_previous_data_shapes() {
        let request = PredictRequest::from_value(&json!({"previous_data": null})).unwrap();
        assert!(request.previous.is_none());

        let err = PredictRequest::from_value(&json!({"previous_data": [1, 2]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);

        assert!(PredictRequest::from_value(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_predict_bad_bool_value() {
        let model = sample_model();
        let mut body = sample_request();
        body["meditated"] = json!("sometimes");

        let err = model
            .predict(&PredictRequest::from_value(&body).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);
    }

    // ============================================================================
    // Artifact tests
    // ============================================================================

    #[test]
    fn test_artifact_reload_preserves_schema_and_predictions() {
        let model = sample_model();
        let request = PredictRequest::from_value(&sample_request()).unwrap();
        let expected = model.predict(&request).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for name in ["mood_model.json", "mood_model.msgpack"] {
            let path = dir.path().join(name);
            model.save(&path).unwrap();
            assert!(!dir.path().join(format!("{name}.tmp")).exists());

            let loaded = MoodModel::load(&path).unwrap();
            assert_eq!(loaded.feature_names(), model.feature_names());
            assert_eq!(loaded.bool_cols(), model.bool_cols());
            assert_eq!(loaded.label_encoder(), model.label_encoder());

            let result = loaded.predict(&request).unwrap();
            assert_eq!(result.prediction, expected.prediction);
            assert_eq!(result.confidence, expected.confidence);
        }
    }

    #[test]
    fn test_artifact_unknown_extension() {
        let model = sample_model();
        let dir = tempfile::tempdir().unwrap();
        let err = model.save(dir.path().join("mood_model.pkl")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Save);

        let err = MoodModel::load(dir.path().join("mood_model.pkl")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
    }

    #[test]
    fn test_failed_save_leaves_nothing_behind() {
        let model = sample_model();
        let dir = tempfile::tempdir().unwrap();

        // parent directory does not exist
        let path = dir.path().join("missing").join("mood_model.json");
        let err = model.save(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Save);
        assert!(!path.exists());
        assert!(!dir.path().join("missing").join("mood_model.json.tmp").exists());

        // target is an existing directory, rename over it fails
        let path = dir.path().join("taken.json");
        std::fs::create_dir(&path).unwrap();
        let err = model.save(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Save);
        assert!(path.is_dir());
        assert!(!dir.path().join("taken.json.tmp").exists());
    }

    #[test]
    fn test_artifact_missing_file() {
        let err = MoodModel::load("/definitely/not/here/mood_model.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
    }

    #[test]
    fn test_artifact_rejects_corruption() {
        let model = sample_model();
        let bytes = model.to_vec(ArtifactFormat::Json).unwrap();

        let err = MoodModel::from_slice(&bytes[..bytes.len() / 2], ArtifactFormat::Json)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);

        let mut value: Value = serde_json::from_slice(&bytes).unwrap();
        value["version"] = json!(2);
        let err = MoodModel::from_slice(&serde_json::to_vec(&value).unwrap(), ArtifactFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("version"));

        let mut value: Value = serde_json::from_slice(&bytes).unwrap();
        value["bool_cols"] = json!(["trained", "not_a_feature"]);
        let err = MoodModel::from_slice(&serde_json::to_vec(&value).unwrap(), ArtifactFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("not_a_feature"));

        let mut value: Value = serde_json::from_slice(&bytes).unwrap();
        value["feature_names"].as_array_mut().unwrap().pop();
        let err = MoodModel::from_slice(&serde_json::to_vec(&value).unwrap(), ArtifactFormat::Json)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
    }

    #[test]
    fn test_format_from_path() {
        use std::path::Path;
        assert_eq!(
            ArtifactFormat::from_path(Path::new("a/b/model.JSON")),
            Some(ArtifactFormat::Json)
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("model.mpk")),
            Some(ArtifactFormat::MessagePack)
        );
        assert_eq!(ArtifactFormat::from_path(Path::new("model")), None);
    }
}
