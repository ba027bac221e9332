use super::*;
use async_trait::async_trait;
use std::sync::Mutex;

struct ScriptedClient {
    replies: Mutex<Vec<Result<PredictionResponse, PredictionError>>>,
    seen: Mutex<Vec<CropFeatures>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<PredictionResponse, PredictionError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn replying(response: PredictionResponse) -> Self {
        Self::new(vec![Ok(response)])
    }

    fn failing(status: u16) -> Self {
        Self::new(vec![Err(PredictionError::Status {
            status,
            message: "upstream unavailable".to_string(),
        })])
    }
}

#[async_trait]
impl PredictionClient for ScriptedClient {
    async fn predict(&self, features: &CropFeatures) -> Result<PredictionResponse, PredictionError> {
        self.seen.lock().expect("seen lock").push(*features);
        self.replies.lock().expect("replies lock").remove(0)
    }
}

fn rice_response() -> PredictionResponse {
    PredictionResponse::new("rice", vec!["add potassium".to_string()])
}

#[test]
fn new_session_is_editing_with_empty_fields() {
    let session = FormSession::new();
    assert!(session.fields().is_empty());
    assert!(session.result().is_none());
    assert!(!session.has_submitted());
    assert_eq!(session.view(), ResultView::Editing);
}

#[test]
fn update_field_keeps_latest_value_for_every_feature() {
    let mut session = FormSession::new();
    let writes = [
        (Feature::Nitrogen, "1"),
        (Feature::Rainfall, "200"),
        (Feature::Nitrogen, "2"),
        (Feature::PhValue, "abc"),
        (Feature::Rainfall, ""),
        (Feature::Nitrogen, "3"),
    ];
    for (feature, value) in writes {
        session.update_field(feature, value);
    }

    let fields: Vec<(Feature, String)> = session
        .fields()
        .iter()
        .map(|(feature, value)| (feature, value.to_string()))
        .collect();
    assert_eq!(
        fields,
        vec![
            (Feature::Nitrogen, "3".to_string()),
            (Feature::Phosphorus, String::new()),
            (Feature::Potassium, String::new()),
            (Feature::Temperature, String::new()),
            (Feature::Humidity, String::new()),
            (Feature::PhValue, "abc".to_string()),
            (Feature::Rainfall, String::new()),
        ]
    );
    assert!(!session.has_submitted());
}

#[test]
fn update_field_by_unknown_name_changes_nothing() {
    let mut session = FormSession::new();
    session.update_field(Feature::Humidity, "80");

    let err = session
        .update_field_by_name("salinity", "3")
        .expect_err("unknown name");
    assert_eq!(err, UnknownFeature("salinity".to_string()));
    assert_eq!(
        session.update_field_by_name("temperature", "21"),
        Ok(Feature::Temperature)
    );
    assert_eq!(session.fields().get(Feature::Humidity), "80");
    assert_eq!(session.fields().get(Feature::Temperature), "21");
}

#[tokio::test]
async fn successful_submit_replaces_result_and_selects_suggestions() {
    let client = ScriptedClient::replying(rice_response());
    let mut session = FormSession::new();
    session.update_field(Feature::Nitrogen, "90");

    let outcome = session.submit(&client).await;

    assert!(outcome.is_applied());
    assert!(session.has_submitted());
    let result = session.result().expect("result");
    assert_eq!(result.predicted_crop.as_deref(), Some("rice"));
    assert_eq!(result.improvements, vec!["add potassium".to_string()]);
    assert_eq!(
        session.view(),
        ResultView::Submitted {
            predicted_crop: Some("rice"),
            improvements: ImprovementsView::Suggestions(&["add potassium".to_string()]),
        }
    );

    let seen = client.seen.lock().expect("seen lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].nitrogen, 90.0);
    assert!(seen[0].phosphorus.is_nan());
}

#[tokio::test]
async fn missing_improvements_select_no_improvements_view() {
    let client = ScriptedClient::replying(PredictionResponse {
        predicted_crop: Some("Coffee".to_string()),
        improvements: None,
    });
    let mut session = FormSession::new();

    session.submit(&client).await;

    assert_eq!(
        session.result().map(|result| result.improvements.clone()),
        Some(Vec::new())
    );
    assert_eq!(
        session.view(),
        ResultView::Submitted {
            predicted_crop: Some("Coffee"),
            improvements: ImprovementsView::NoneNeeded,
        }
    );
}

#[tokio::test]
async fn empty_label_hides_success_panel() {
    let client = ScriptedClient::replying(PredictionResponse {
        predicted_crop: Some(String::new()),
        improvements: Some(vec!["Increase Rainfall: Introduce irrigation systems".into()]),
    });
    let mut session = FormSession::new();

    session.submit(&client).await;

    assert!(matches!(
        session.view(),
        ResultView::Submitted {
            predicted_crop: None,
            improvements: ImprovementsView::Suggestions(_),
        }
    ));
}

#[tokio::test]
async fn failed_submit_keeps_previous_result() {
    let mut session = FormSession::new();
    session
        .submit(&ScriptedClient::replying(rice_response()))
        .await;

    let outcome = session.submit(&ScriptedClient::failing(503)).await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(PredictionError::Status { status: 503, .. })
    ));
    assert!(session.has_submitted());
    assert_eq!(
        session.result().and_then(|result| result.predicted_crop.as_deref()),
        Some("rice")
    );
}

#[tokio::test]
async fn clear_resets_everything_regardless_of_prior_state() {
    let mut session = FormSession::new();
    for feature in Feature::ALL {
        session.update_field(feature, "12");
    }
    session
        .submit(&ScriptedClient::replying(rice_response()))
        .await;

    session.clear();

    assert_eq!(session.fields(), &FieldSet::new());
    assert!(session.result().is_none());
    assert!(!session.has_submitted());
    assert_eq!(session.view(), ResultView::Editing);

    session.clear();
    assert_eq!(session.view(), ResultView::Editing);
}

#[test]
fn older_ticket_cannot_overwrite_newer_submission() {
    let mut session = FormSession::new();
    let first = session.begin_submission();
    let second = session.begin_submission();
    assert!(second.id > first.id);

    let outcome = session.complete_submission(
        second.id,
        Ok(PredictionResponse::new("Mango", Vec::new())),
    );
    assert!(outcome.is_applied());

    let late = session.complete_submission(first.id, Ok(rice_response()));
    assert!(matches!(late, SubmitOutcome::Superseded));
    assert_eq!(
        session.result().and_then(|result| result.predicted_crop.as_deref()),
        Some("Mango")
    );
}

#[test]
fn response_arriving_after_clear_is_discarded() {
    let mut session = FormSession::new();
    let ticket = session.begin_submission();
    assert!(session.is_pending());

    session.clear();
    let outcome = session.complete_submission(ticket.id, Ok(rice_response()));

    assert!(matches!(outcome, SubmitOutcome::Superseded));
    assert!(session.result().is_none());
    assert!(!session.has_submitted());
    assert!(!session.is_pending());
}

#[test]
fn ticket_snapshots_coerced_values_at_submission_time() {
    let mut session = FormSession::new();
    session.update_field(Feature::Temperature, " 21.5C");
    let ticket = session.begin_submission();
    session.update_field(Feature::Temperature, "40");

    assert_eq!(ticket.features.temperature, 21.5);
    assert!(ticket.features.rainfall.is_nan());
}

#[test]
fn abandoned_ticket_releases_pending_and_keeps_form() {
    let mut session = FormSession::new();
    session.update_field(Feature::Nitrogen, "90");
    let ticket = session.begin_submission();

    session.abandon_submission(ticket.id);
    session.update_field(Feature::Potassium, "40");

    assert!(!session.is_pending());
    assert!(session.has_submitted());
    assert_eq!(session.fields().get(Feature::Nitrogen), "90");
    assert!(matches!(
        session.complete_submission(ticket.id, Ok(rice_response())),
        SubmitOutcome::Superseded
    ));
}

#[test]
fn abandoning_an_older_ticket_keeps_newer_one_pending() {
    let mut session = FormSession::new();
    let first = session.begin_submission();
    let second = session.begin_submission();

    session.abandon_submission(first.id);

    assert!(session.is_pending());
    assert!(session
        .complete_submission(second.id, Ok(rice_response()))
        .is_applied());
}
