#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::api::app::{create_app, AppContext};
    use crate::domain::model::{
        Banner, ChargeOutcome, LedgerEntry, NewTransaction, Service, Transaction,
        TransactionType, User,
    };
    use crate::domain::repository::{
        MockBlobStore, MockCatalogRepository, MockLedgerRepository, MockUserRepository,
    };
    use crate::infra::auth::jwt::JwtManager;
    use crate::infra::auth::password::PasswordHasher;
    use actix_web::http::header::{ContentType, AUTHORIZATION, CONTENT_TYPE};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::Value;
    use std::sync::Arc;

    const SECRET_KEY: &str = "53b65289550252052c61406f0f3dad24";
    const EMAIL: &str = "rifqi@gmail.com";
    const MAX_UPLOAD_BYTES: usize = 1024;

    #[derive(Default)]
    struct Mocks {
        users: MockUserRepository,
        catalog: MockCatalogRepository,
        ledger: MockLedgerRepository,
        blobs: MockBlobStore,
    }

    impl Mocks {
        fn into_context(self) -> AppContext {
            AppContext {
                user_repo: Arc::new(self.users),
                catalog_repo: Arc::new(self.catalog),
                ledger_repo: Arc::new(self.ledger),
                blob_store: Arc::new(self.blobs),
                jwt_secret: SECRET_KEY.to_string(),
                bcrypt_cost: 4,
                max_upload_bytes: MAX_UPLOAD_BYTES,
                allow_negative_balance: false,
            }
        }
    }

    fn user(password_hash: &str) -> User {
        User {
            id: 1,
            email: EMAIL.to_string(),
            first_name: "Rifqi".to_string(),
            last_name: "Mubarok".to_string(),
            password_hash: password_hash.to_string(),
            profile_image: None,
        }
    }

    fn bearer() -> (actix_web::http::header::HeaderName, String) {
        let token = JwtManager::new(SECRET_KEY)
            .gen_user_token(&user("hash"))
            .unwrap();
        (AUTHORIZATION, format!("Bearer {}", token))
    }

    fn written(entry: NewTransaction, balance: i64) -> LedgerEntry {
        LedgerEntry {
            transaction: Transaction::from(entry),
            balance,
        }
    }

    fn record(invoice: &str, transaction_type: TransactionType, amount: i64) -> Transaction {
        Transaction {
            invoice_number: invoice.to_string(),
            email: EMAIL.to_string(),
            service_code: "PLN".to_string(),
            service_name: "Listrik".to_string(),
            transaction_type,
            total_amount: amount,
            created_on: Utc::now(),
        }
    }

    async fn call(mocks: Mocks, req: test::TestRequest) -> (StatusCode, Value) {
        let app =
            test::init_service(App::new().configure(create_app(mocks.into_context()))).await;
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header(ContentType::json())
            .set_payload(body.to_string())
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = test::init_service(
            App::new().configure(create_app(Mocks::default().into_context())),
        )
        .await;

        let req = test::TestRequest::post().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[actix_web::test]
    async fn test_registration_rejects_malformed_email() {
        let mut mocks = Mocks::default();
        mocks.users.expect_find_by_email().never();
        mocks.users.expect_create_user().never();

        let (status, body) = call(
            mocks,
            post_json(
                "/registration",
                r#"{"email": "not-an-email", "first_name": "Rifqi", "last_name": "Mubarok", "password": "abcdef1234"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 102);
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn test_registration_rejects_short_password() {
        let mut mocks = Mocks::default();
        mocks.users.expect_create_user().never();

        let (status, body) = call(
            mocks,
            post_json(
                "/registration",
                r#"{"email": "rifqi@gmail.com", "first_name": "Rifqi", "last_name": "Mubarok", "password": "short"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 102);
    }

    #[actix_web::test]
    async fn test_registration_rejects_malformed_body() {
        let (status, body) = call(Mocks::default(), post_json("/registration", "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 102);
    }

    #[actix_web::test]
    async fn test_registration() {
        let mut mocks = Mocks::default();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks
            .users
            .expect_create_user()
            .times(1)
            .returning(|new_user| Ok(user(&new_user.password_hash)));

        let (status, body) = call(
            mocks,
            post_json(
                "/registration",
                r#"{"email": "rifqi@gmail.com", "first_name": "Rifqi", "last_name": "Mubarok", "password": "abcdef1234"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 0);
        assert_eq!(body["message"], "Registrasi berhasil silahkan login");
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn test_login_and_profile() {
        let hash = PasswordHasher::new(4).hash("abcdef1234").await.unwrap();
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_find_by_email()
            .with(eq(EMAIL))
            .returning(move |_| Ok(Some(user(&hash))));

        let app =
            test::init_service(App::new().configure(create_app(mocks.into_context()))).await;

        let req = post_json("/login", r#"{"email": "rifqi@gmail.com", "password": "abcdef1234"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert_eq!(JwtManager::new(SECRET_KEY).verify(&token).unwrap().email, EMAIL);

        let req = test::TestRequest::get()
            .uri("/profile")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["email"], EMAIL);
        assert_eq!(body["data"]["first_name"], "Rifqi");
        assert_eq!(body["data"]["profile_image"], Value::Null);
        assert!(body["data"].get("password_hash").is_none());

        let req = post_json("/login", r#"{"email": "rifqi@gmail.com", "password": "wrong password"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 103);
    }

    #[actix_web::test]
    async fn test_login_rejects_short_password() {
        let mut mocks = Mocks::default();
        mocks.users.expect_find_by_email().never();

        let (status, body) = call(
            mocks,
            post_json("/login", r#"{"email": "rifqi@gmail.com", "password": "short"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 103);
        assert_eq!(body["message"], "Password harus minimal 8 karakter");
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        for uri in ["/profile", "/balance", "/information/banner", "/transaction/history"] {
            let (status, body) = call(Mocks::default(), test::TestRequest::get().uri(uri)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["status"], 108, "{uri}");
        }

        let (status, body) = call(
            Mocks::default(),
            test::TestRequest::get()
                .uri("/balance")
                .insert_header((AUTHORIZATION, "Bearer not.a.token")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 108);
    }

    #[actix_web::test]
    async fn test_update_profile() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_update_profile()
            .with(eq(EMAIL), eq("Rifqi Edit"), eq("Mubarok Edit"))
            .times(1)
            .returning(|_, first_name, last_name| {
                let mut updated = user("hash");
                updated.first_name = first_name.to_string();
                updated.last_name = last_name.to_string();
                Ok(Some(updated))
            });

        let (status, body) = call(
            mocks,
            test::TestRequest::put()
                .uri("/profile/update")
                .insert_header(bearer())
                .insert_header(ContentType::json())
                .set_payload(r#"{"first_name": "Rifqi Edit", "last_name": "Mubarok Edit"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["first_name"], "Rifqi Edit");
        assert_eq!(body["data"]["last_name"], "Mubarok Edit");
    }

    fn multipart(content_type: &str) -> test::TestRequest {
        multipart_with(content_type, "not really pixels")
    }

    fn multipart_with(content_type: &str, pixels: &str) -> test::TestRequest {
        let boundary = "ppob-boundary";
        let payload = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"profile_image\"; filename=\"me.img\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {pixels}\r\n\
             --{boundary}--\r\n"
        );
        test::TestRequest::put()
            .uri("/profile/image")
            .insert_header(bearer())
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(payload)
    }

    #[actix_web::test]
    async fn test_profile_image_rejects_gif() {
        let mut mocks = Mocks::default();
        mocks.blobs.expect_store().never();
        mocks.users.expect_update_profile_image().never();

        let (status, body) = call(mocks, multipart("image/gif")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 102);
    }

    #[actix_web::test]
    async fn test_profile_image_too_large() {
        let mut mocks = Mocks::default();
        mocks.users.expect_find_by_email().never();
        mocks.blobs.expect_store().never();
        mocks.users.expect_update_profile_image().never();

        let pixels = "x".repeat(MAX_UPLOAD_BYTES + 1);
        let (status, body) = call(mocks, multipart_with("image/png", &pixels)).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], 102);
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn test_profile_image_png() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user("hash"))));
        mocks
            .blobs
            .expect_store()
            .withf(|owner, extension, bytes| {
                owner == EMAIL && extension == "png" && bytes.as_slice() == b"not really pixels"
            })
            .times(1)
            .returning(|_, _, _| Ok("/uploads/profile_images/rifqi.png".to_string()));
        mocks
            .users
            .expect_update_profile_image()
            .times(1)
            .returning(|_, image| {
                let mut updated = user("hash");
                updated.profile_image = Some(image.to_string());
                Ok(Some(updated))
            });

        let (status, body) = call(mocks, multipart("image/png")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["profile_image"], "/uploads/profile_images/rifqi.png");
    }

    #[actix_web::test]
    async fn test_catalog() {
        let mut mocks = Mocks::default();
        mocks.catalog.expect_list_banners().returning(|| {
            Ok(vec![Banner {
                banner_name: "Banner 1".to_string(),
                banner_image: "https://nutech-integrasi.app/banner1.jpg".to_string(),
                description: "Lerem Ipsum Dolor sit amet".to_string(),
            }])
        });

        let (status, body) = call(
            mocks,
            test::TestRequest::get()
                .uri("/information/banner")
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["banner_name"], "Banner 1");
    }

    #[actix_web::test]
    async fn test_balance_store_failure_is_generic() {
        let mut mocks = Mocks::default();
        mocks
            .ledger
            .expect_balance()
            .returning(|_| Err(anyhow::anyhow!("connection reset by peer")));

        let (status, body) = call(
            mocks,
            test::TestRequest::get().uri("/balance").insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn test_top_up_rejects_invalid_amounts() {
        for payload in [
            r#"{"top_up_amount": 0}"#,
            r#"{"top_up_amount": -100}"#,
            r#"{"top_up_amount": "100"}"#,
            r#"{"top_up_amount": 10.5}"#,
            r#"{}"#,
        ] {
            let mut mocks = Mocks::default();
            mocks.ledger.expect_top_up().never();

            let (status, body) = call(
                mocks,
                post_json("/topup", payload).insert_header(bearer()),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body["status"], 102, "{payload}");
        }
    }

    #[actix_web::test]
    async fn test_top_up_returns_new_balance() {
        let mut mocks = Mocks::default();
        mocks
            .ledger
            .expect_top_up()
            .withf(|entry| entry.email == EMAIL && entry.total_amount == 1_000_000)
            .times(1)
            .returning(|entry| Ok(written(entry, 1_500_000)));

        let (status, body) = call(
            mocks,
            post_json("/topup", r#"{"top_up_amount": 1000000}"#).insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Top Up Balance Berhasil");
        assert_eq!(body["data"]["balance"], 1_500_000);
    }

    #[actix_web::test]
    async fn test_transaction_pulsa() {
        let mut mocks = Mocks::default();
        mocks
            .catalog
            .expect_find_service()
            .with(eq("PULSA"))
            .returning(|_| {
                Ok(Some(Service {
                    service_code: "PULSA".to_string(),
                    service_name: "Pulsa".to_string(),
                    service_icon: "https://nutech-integrasi.app/dummy.jpg".to_string(),
                    service_tarif: 40000,
                }))
            });
        mocks
            .ledger
            .expect_charge()
            .times(1)
            .returning(|entry, _| Ok(ChargeOutcome::Charged(written(entry, 980_000))));

        let (status, body) = call(
            mocks,
            post_json("/transaction", r#"{"service_code": "PULSA", "amount": 20000}"#)
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["service_code"], "PULSA");
        assert_eq!(data["service_name"], "Pulsa");
        assert_eq!(data["transaction_type"], "PAYMENT");
        assert_eq!(data["total_amount"], 20000);
        assert!(data["invoice_number"].as_str().unwrap().starts_with("INV"));
        assert!(data.get("email").is_none());
    }

    #[actix_web::test]
    async fn test_transaction_unknown_service() {
        let mut mocks = Mocks::default();
        mocks.catalog.expect_find_service().returning(|_| Ok(None));
        mocks.ledger.expect_charge().never();

        let (status, body) = call(
            mocks,
            post_json("/transaction", r#"{"service_code": "NOPE", "amount": 20000}"#)
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 102);
    }

    #[actix_web::test]
    async fn test_history_rejects_bad_limit() {
        let mut mocks = Mocks::default();
        mocks.ledger.expect_history().never();

        let (status, body) = call(
            mocks,
            test::TestRequest::get()
                .uri("/transaction/history?limit=abc")
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 102);
    }

    #[actix_web::test]
    async fn test_history_empty() {
        let mut mocks = Mocks::default();
        mocks.ledger.expect_history().returning(|_, _| Ok(vec![]));

        let (status, _) = call(
            mocks,
            test::TestRequest::get()
                .uri("/transaction/history")
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_history_records() {
        let mut mocks = Mocks::default();
        mocks
            .ledger
            .expect_history()
            .with(eq(EMAIL), eq(Some(2)))
            .returning(|_, _| {
                Ok(vec![
                    record("INV17082023-102", TransactionType::Payment, 10_000),
                    record("INV17082023-101", TransactionType::Topup, 100_000),
                ])
            });

        let (status, body) = call(
            mocks,
            test::TestRequest::get()
                .uri("/transaction/history?limit=2")
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Get Transactions Berhasil");
        let data = &body["data"];
        assert_eq!(data["offset"], 0);
        assert_eq!(data["limit"], 2);
        let records = data["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["invoice_number"], "INV17082023-102");
        assert_eq!(records[0]["description"], "Listrik");
        assert_eq!(records[1]["transaction_type"], "TOPUP");
    }
}
