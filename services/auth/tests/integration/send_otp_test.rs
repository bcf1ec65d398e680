use chrono::{Duration, Utc};

use lovelite_auth::error::AuthServiceError;
use lovelite_auth::usecase::send_otp::{SendOtpInput, SendOtpUseCase};

use crate::helpers::{FixedClock, MockMailer, MockOtpRepo, test_otp_code};

#[tokio::test]
async fn should_store_code_and_send_email() {
    let now = Utc::now();
    let repo = MockOtpRepo::empty();
    let codes_handle = repo.codes_handle();
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();

    let uc = SendOtpUseCase {
        otp_codes: repo,
        mailer,
        clock: FixedClock(now),
    };

    uc.execute(SendOtpInput {
        email: "user@example.com".to_owned(),
    })
    .await
    .unwrap();

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 1, "expected exactly one stored code");
    let row = &codes[0];
    assert_eq!(row.email, "user@example.com");
    assert_eq!(row.code.len(), 6, "code should be 6 digits");
    assert!(row.code.chars().all(|c| c.is_ascii_digit()));
    assert!(!row.used, "fresh code should not be used");
    assert_eq!(row.expires_at, now + Duration::seconds(600));

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1, "expected exactly one email");
    assert_eq!(sent[0].0, "user@example.com");
    assert_eq!(sent[0].1, row.code, "email should carry the stored code");
}

#[tokio::test]
async fn should_normalize_email_before_storing() {
    let repo = MockOtpRepo::empty();
    let codes_handle = repo.codes_handle();

    let uc = SendOtpUseCase {
        otp_codes: repo,
        mailer: MockMailer::new(),
        clock: FixedClock(Utc::now()),
    };

    uc.execute(SendOtpInput {
        email: "  User@Example.COM ".to_owned(),
    })
    .await
    .unwrap();

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes[0].email, "user@example.com");
}

#[tokio::test]
async fn should_reject_missing_email() {
    let uc = SendOtpUseCase {
        otp_codes: MockOtpRepo::empty(),
        mailer: MockMailer::new(),
        clock: FixedClock(Utc::now()),
    };

    let result = uc
        .execute(SendOtpInput {
            email: "   ".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailRequired)),
        "expected EmailRequired, got {result:?}"
    );
}

#[tokio::test]
async fn should_supersede_outstanding_codes() {
    let now = Utc::now();
    let repo = MockOtpRepo::new(vec![test_otp_code("user@example.com", "111111", now)]);
    let codes_handle = repo.codes_handle();

    let uc = SendOtpUseCase {
        otp_codes: repo,
        mailer: MockMailer::new(),
        clock: FixedClock(now),
    };

    uc.execute(SendOtpInput {
        email: "user@example.com".to_owned(),
    })
    .await
    .unwrap();

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 2);
    let old = codes.iter().find(|c| c.code == "111111").unwrap();
    assert!(old.used, "prior code should be invalidated");
    let fresh = codes.iter().find(|c| c.code != "111111").unwrap();
    assert!(!fresh.used, "new code should be live");
}

#[tokio::test]
async fn should_not_send_email_when_store_write_fails() {
    let mut repo = MockOtpRepo::empty();
    repo.fail_create = true;
    let mailer = MockMailer::new();
    let sent_handle = mailer.sent_handle();

    let uc = SendOtpUseCase {
        otp_codes: repo,
        mailer,
        clock: FixedClock(Utc::now()),
    };

    let result = uc
        .execute(SendOtpInput {
            email: "user@example.com".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::CodeStore(_))),
        "expected CodeStore, got {result:?}"
    );
    assert!(
        sent_handle.lock().unwrap().is_empty(),
        "no email may be sent before the code is durable"
    );
}

#[tokio::test]
async fn should_surface_delivery_failure_after_storing() {
    let repo = MockOtpRepo::empty();
    let codes_handle = repo.codes_handle();
    let mut mailer = MockMailer::new();
    mailer.fail = true;

    let uc = SendOtpUseCase {
        otp_codes: repo,
        mailer,
        clock: FixedClock(Utc::now()),
    };

    let result = uc
        .execute(SendOtpInput {
            email: "user@example.com".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::EmailDelivery(_))),
        "expected EmailDelivery, got {result:?}"
    );
    // The stored row stays; the caller recovers by requesting a new code.
    assert_eq!(codes_handle.lock().unwrap().len(), 1);
}
