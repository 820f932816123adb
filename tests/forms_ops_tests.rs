use forms_abilities::config::DB_VERSION;
use forms_abilities::service::{FormsListing, FormsOps};
use forms_abilities::types::{CountSubmissionsInput, GetSubmissionInput, SubmitFormInput};
use forms_abilities::FormsStorage;

async fn seeded_ops() -> FormsOps {
    let storage = FormsStorage::in_memory().await.expect("open in-memory db");
    storage.initialize().await.expect("initialize schema");
    FormsOps::new(storage)
}

fn submission(form_id: i64, email: &str) -> SubmitFormInput {
    SubmitFormInput {
        form_id,
        name: "Ada Lovelace".to_string(),
        email: email.to_string(),
        message: "Hello there".to_string(),
    }
}

#[tokio::test]
async fn initialize_seeds_one_form_and_records_version() {
    let ops = seeded_ops().await;

    let out = ops.count_forms(FormsListing::WithForms).await.unwrap();
    assert_eq!(out.count, 1);
    let forms = out.forms.expect("listing requested");
    assert_eq!(forms[0].title, "Contact Form");
    assert_eq!(
        forms[0].description.as_deref(),
        Some("A simple contact form for demonstration purposes.")
    );

    assert_eq!(
        ops.storage().db_version().await.unwrap().as_deref(),
        Some(DB_VERSION)
    );
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let ops = seeded_ops().await;
    ops.storage().initialize().await.unwrap();
    ops.storage().initialize().await.unwrap();

    let out = ops.count_forms(FormsListing::CountOnly).await.unwrap();
    assert_eq!(out.count, 1);
    assert!(out.forms.is_none());
}

#[tokio::test]
async fn submit_then_get_returns_sanitized_record() {
    let ops = seeded_ops().await;

    let submitted = ops
        .submit_form(SubmitFormInput {
            form_id: 1,
            name: "  <b>Ada</b>  ".to_string(),
            email: " ada@example.com ".to_string(),
            message: "line one\nline <i>two</i>".to_string(),
        })
        .await;
    assert!(submitted.success);
    assert_eq!(submitted.message, "Form submitted successfully.");
    let id = submitted.submission_id.expect("id on success");

    let fetched = ops
        .get_submission(GetSubmissionInput { submission_id: id })
        .await;
    assert!(fetched.success);
    assert_eq!(fetched.message, "Submission retrieved successfully.");
    let record = fetched.submission.expect("record on success");
    assert_eq!(record.id, id);
    assert_eq!(record.form_id, 1);
    assert_eq!(record.name, "Ada");
    assert_eq!(record.email, "ada@example.com");
    assert_eq!(record.message, "line one\nline two");
    assert_eq!(record.submitted_at.len(), "2000-01-01 00:00:00".len());
}

#[tokio::test]
async fn submit_to_unknown_form_stores_nothing() {
    let ops = seeded_ops().await;

    let out = ops.submit_form(submission(42, "ada@example.com")).await;
    assert!(!out.success);
    assert_eq!(out.submission_id, None);
    assert_eq!(out.message, "Form not found.");

    let count = ops
        .count_submissions(CountSubmissionsInput { form_id: None })
        .await
        .unwrap();
    assert_eq!(count.count, 0);
}

#[tokio::test]
async fn submit_rejects_invalid_email() {
    let ops = seeded_ops().await;

    let out = ops.submit_form(submission(1, "not-an-email")).await;
    assert!(!out.success);
    assert_eq!(out.message, "Invalid email address.");

    let count = ops
        .count_submissions(CountSubmissionsInput { form_id: None })
        .await
        .unwrap();
    assert_eq!(count.count, 0);
}

#[tokio::test]
async fn count_submissions_filters_by_form() {
    let ops = seeded_ops().await;
    let second = ops.storage().create_form("Feedback", None).await.unwrap();

    for _ in 0..3 {
        assert!(ops.submit_form(submission(1, "a@example.com")).await.success);
    }
    for _ in 0..5 {
        assert!(
            ops.submit_form(submission(second, "b@example.com"))
                .await
                .success
        );
    }

    let all = ops
        .count_submissions(CountSubmissionsInput { form_id: None })
        .await
        .unwrap();
    assert_eq!(all.count, 8);
    assert_eq!(all.form_id, None);

    let first = ops
        .count_submissions(CountSubmissionsInput { form_id: Some(1) })
        .await
        .unwrap();
    assert_eq!(first.count, 3);
    assert_eq!(first.form_id, Some(1));

    let forms = ops.count_forms(FormsListing::WithForms).await.unwrap();
    assert_eq!(forms.count, 2);
    let ids: Vec<i64> = forms.forms.unwrap().iter().map(|f| f.id).collect();
    assert_eq!(ids, [1, second]);
}

#[tokio::test]
async fn missing_submission_is_not_an_error() {
    let ops = seeded_ops().await;

    let out = ops
        .get_submission(GetSubmissionInput {
            submission_id: 999_999,
        })
        .await;
    assert!(!out.success);
    assert!(out.submission.is_none());
    assert_eq!(out.message, "Submission not found.");
}

#[tokio::test]
async fn updating_a_form_refreshes_updated_at() {
    let ops = seeded_ops().await;
    sqlx::query("UPDATE forms SET updated_at = '2000-01-01 00:00:00' WHERE id = 1")
        .execute(ops.storage().pool())
        .await
        .unwrap();

    let renamed = sqlx::query("UPDATE forms SET title = ? WHERE id = ?")
        .bind("Renamed")
        .bind(1_i64)
        .execute(ops.storage().pool())
        .await
        .unwrap();
    assert_eq!(renamed.rows_affected(), 1);

    let forms = ops.storage().list_forms().await.unwrap();
    assert_eq!(forms[0].title, "Renamed");
    assert_ne!(forms[0].updated_at, "2000-01-01 00:00:00");
}

#[tokio::test]
async fn fields_emptied_by_sanitizing_are_not_stored() {
    let ops = seeded_ops().await;

    let out = ops
        .submit_form(SubmitFormInput {
            form_id: 1,
            name: "<b></b>".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello".to_string(),
        })
        .await;
    assert!(!out.success);
    assert_eq!(out.message, "Failed to submit form.");

    let count = ops
        .count_submissions(CountSubmissionsInput { form_id: None })
        .await
        .unwrap();
    assert_eq!(count.count, 0);
}
