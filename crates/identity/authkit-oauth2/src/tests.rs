//! Integration tests for the provider exchanges.

#[cfg(test)]
mod integration_tests {
    use crate::{
        ExchangeConfig, GitHubEndpoints, GitHubProvider, GoogleEndpoints, GoogleProvider,
        OAuth2Error, OAuth2Provider, ProviderCredentials, ProviderRegistry,
    };
    use authkit_core::Provider;
    use std::collections::HashMap;
    use std::sync::Arc;
    use url::Url;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:3000/callback".to_string(),
        }
    }

    fn google_against(server: &MockServer) -> GoogleProvider {
        GoogleProvider::new(credentials(), &ExchangeConfig::default()).with_endpoints(
            GoogleEndpoints {
                authorization: format!("{}/authorize", server.uri()),
                token: format!("{}/token", server.uri()),
                userinfo: format!("{}/userinfo", server.uri()),
            },
        )
    }

    fn github_against(server: &MockServer) -> GitHubProvider {
        GitHubProvider::new(credentials(), &ExchangeConfig::default()).with_endpoints(
            GitHubEndpoints {
                authorization: format!("{}/login/oauth/authorize", server.uri()),
                token: format!("{}/login/oauth/access_token", server.uri()),
                user: format!("{}/user", server.uri()),
                emails: format!("{}/user/emails", server.uri()),
            },
        )
    }

    #[test]
    fn google_authorize_url_carries_the_expected_parameters() {
        let provider = GoogleProvider::new(credentials(), &ExchangeConfig::default());

        let url = Url::parse(&provider.authorize_url()).unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));

        let params: HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params.get("response_type"), Some(&"code".into()));
        assert_eq!(params.get("client_id"), Some(&"test_client_id".into()));
        assert_eq!(
            params.get("redirect_uri"),
            Some(&"http://localhost:3000/callback".into())
        );
        assert_eq!(params.get("scope"), Some(&"openid email profile".into()));
    }

    #[test]
    fn github_authorize_url_carries_the_expected_parameters() {
        let provider = GitHubProvider::new(credentials(), &ExchangeConfig::default());

        let url = Url::parse(&provider.authorize_url()).unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
        assert_eq!(url.path(), "/login/oauth/authorize");

        let params: HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params.get("client_id"), Some(&"test_client_id".into()));
        assert_eq!(params.get("scope"), Some(&"user:email".into()));
    }

    #[tokio::test]
    async fn google_exchange_yields_a_normalized_identity() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=mock_auth_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "mock_access_token",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("Authorization", "Bearer mock_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "12345",
                "email": "test@example.com",
                "email_verified": true,
                "name": "Test User"
            })))
            .mount(&server)
            .await;

        let identity = google_against(&server)
            .exchange_code("mock_auth_code")
            .await
            .unwrap();

        assert_eq!(identity.provider, Provider::Google);
        assert_eq!(identity.provider_user_id, "12345");
        assert_eq!(identity.email, "test@example.com");
        assert_eq!(identity.display_name, "Test User");
    }

    #[tokio::test]
    async fn google_profile_without_name_falls_back_to_a_placeholder() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "mock_access_token"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "12345",
                "email": "test@example.com"
            })))
            .mount(&server)
            .await;

        let identity = google_against(&server)
            .exchange_code("mock_auth_code")
            .await
            .unwrap();

        assert_eq!(identity.display_name, "Google User");
    }

    #[tokio::test]
    async fn rejected_grant_fails_the_exchange() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant"
            })))
            .mount(&server)
            .await;

        let err = google_against(&server)
            .exchange_code("bad_code")
            .await
            .unwrap_err();

        assert!(matches!(err, OAuth2Error::ExchangeFailed(_)));
    }

    #[tokio::test]
    async fn failing_profile_endpoint_fails_the_profile_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "mock_access_token"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = google_against(&server)
            .exchange_code("mock_auth_code")
            .await
            .unwrap_err();

        assert!(matches!(err, OAuth2Error::ProfileFetchFailed(_)));
    }

    #[tokio::test]
    async fn github_exchange_uses_the_public_profile_email_when_present() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "gh_token",
                "token_type": "bearer",
                "scope": "user:email"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", "Bearer gh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 9876,
                "login": "octocat",
                "name": "The Octocat",
                "email": "octocat@example.com"
            })))
            .mount(&server)
            .await;

        let identity = github_against(&server)
            .exchange_code("mock_auth_code")
            .await
            .unwrap();

        assert_eq!(identity.provider, Provider::Github);
        assert_eq!(identity.provider_user_id, "9876");
        assert_eq!(identity.email, "octocat@example.com");
        assert_eq!(identity.display_name, "The Octocat");
    }

    #[tokio::test]
    async fn github_exchange_falls_back_to_the_primary_verified_email() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "gh_token"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 9876,
                "login": "octocat",
                "name": null,
                "email": null
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "email": "old@example.com", "primary": false, "verified": true },
                { "email": "unverified@example.com", "primary": true, "verified": false },
                { "email": "octocat@example.com", "primary": true, "verified": true }
            ])))
            .mount(&server)
            .await;

        let identity = github_against(&server)
            .exchange_code("mock_auth_code")
            .await
            .unwrap();

        assert_eq!(identity.email, "octocat@example.com");
        // No display name on the profile, so the login stands in.
        assert_eq!(identity.display_name, "octocat");
    }

    #[tokio::test]
    async fn github_without_a_verified_primary_email_fails() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "gh_token"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 9876,
                "login": "octocat"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "email": "unverified@example.com", "primary": true, "verified": false }
            ])))
            .mount(&server)
            .await;

        let err = github_against(&server)
            .exchange_code("mock_auth_code")
            .await
            .unwrap_err();

        assert!(matches!(err, OAuth2Error::NoVerifiedEmail));
    }

    #[tokio::test]
    async fn github_rejects_a_bad_code_with_a_200_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "bad_verification_code"
            })))
            .mount(&server)
            .await;

        let err = github_against(&server)
            .exchange_code("bad_code")
            .await
            .unwrap_err();

        assert!(matches!(err, OAuth2Error::ExchangeFailed(_)));
    }

    #[tokio::test]
    async fn registry_maps_provider_names_to_implementations() {
        let registry = ProviderRegistry::new()
            .register(Arc::new(GoogleProvider::new(
                credentials(),
                &ExchangeConfig::default(),
            )))
            .register(Arc::new(GitHubProvider::new(
                credentials(),
                &ExchangeConfig::default(),
            )));

        assert_eq!(
            registry.get(Provider::Google).map(|p| p.provider()),
            Some(Provider::Google)
        );
        assert_eq!(
            registry.get(Provider::Github).map(|p| p.provider()),
            Some(Provider::Github)
        );
    }
}
