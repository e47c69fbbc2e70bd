//! Integration tests for the friendship state machine and user lookup
//!
//! - POST /api/friends/{id}/request | approve | decline
//! - DELETE /api/friends/{id}
//! - GET /api/friends, GET /api/friends/requests/incoming
//! - GET /api/users/search, GET /api/users/{id}

mod common;

#[cfg(test)]
mod friend_tests {
    use super::common::*;
    use aura::domain::{FriendshipStatus, Identity};
    use aura::dtos::{CreateFriendshipDTO, CreateUserDTO, FriendshipDTO};
    use aura::repositories::Create;
    use axum::http::StatusCode;
    use serde_json::Value;

    #[tokio::test]
    async fn test_request_then_approve() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;

        let response = server
            .post(&format!("/api/friends/{}/request", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<FriendshipDTO>().status,
            FriendshipStatus::RequestedOutgoing
        );

        let incoming = server
            .get("/api/friends/requests/incoming")
            .authorization_bearer(&bo.token)
            .await
            .json::<Vec<Identity>>();
        assert_eq!(incoming, vec![ann.identity.clone()]);

        let response = server
            .post(&format!("/api/friends/{}/approve", ann.identity.id))
            .authorization_bearer(&bo.token)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<FriendshipDTO>().status,
            FriendshipStatus::Confirmed
        );

        for (me, other) in [(&ann, &bo), (&bo, &ann)] {
            let friends = server
                .get("/api/friends")
                .authorization_bearer(&me.token)
                .await
                .json::<Vec<Identity>>();
            assert_eq!(friends, vec![other.identity.clone()]);
        }

        let incoming = server
            .get("/api/friends/requests/incoming")
            .authorization_bearer(&bo.token)
            .await
            .json::<Vec<Identity>>();
        assert!(incoming.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_requests_are_rejected() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;

        server
            .post(&format!("/api/friends/{}/request", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await
            .assert_status_ok();

        // Same direction and the opposite one
        for (from, to) in [(&ann, &bo), (&bo, &ann)] {
            let response = server
                .post(&format!("/api/friends/{}/request", to.identity.id))
                .authorization_bearer(&from.token)
                .await;
            response.assert_status(StatusCode::CONFLICT);
            assert_eq!(response.json::<Value>()["code"], "already_requested");
        }

        server
            .post(&format!("/api/friends/{}/approve", ann.identity.id))
            .authorization_bearer(&bo.token)
            .await
            .assert_status_ok();

        let response = server
            .post(&format!("/api/friends/{}/request", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["code"], "already_connected");
    }

    #[tokio::test]
    async fn test_storage_holds_one_record_per_pair() {
        let state = create_test_state().await;
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;

        // Both sides passed the read before either insert
        state
            .friendship
            .create(&CreateFriendshipDTO {
                requester_id: ann.identity.id,
                addressee_id: bo.identity.id,
            })
            .await
            .unwrap();
        let err = state
            .friendship
            .create(&CreateFriendshipDTO {
                requester_id: bo.identity.id,
                addressee_id: ann.identity.id,
            })
            .await
            .unwrap_err();
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }

        let server = create_test_server(state.clone());
        let incoming = server
            .get("/api/friends/requests/incoming")
            .authorization_bearer(&ann.token)
            .await
            .json::<Vec<Identity>>();
        assert!(incoming.is_empty());
    }

    #[tokio::test]
    async fn test_only_the_addressee_can_approve() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;

        let response = server
            .post(&format!("/api/friends/{}/approve", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "no_such_request");

        server
            .post(&format!("/api/friends/{}/request", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await
            .assert_status_ok();

        // The requester cannot approve its own outgoing request
        let response = server
            .post(&format!("/api/friends/{}/approve", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "no_such_request");
    }

    #[tokio::test]
    async fn test_decline_allows_a_new_request() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;

        server
            .post(&format!("/api/friends/{}/request", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await
            .assert_status_ok();

        let response = server
            .post(&format!("/api/friends/{}/decline", ann.identity.id))
            .authorization_bearer(&bo.token)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<FriendshipDTO>().status, FriendshipStatus::None);

        server
            .post(&format!("/api/friends/{}/request", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_remove_returns_pair_to_none() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;
        befriend(&server, &ann, &bo).await;

        let response = server
            .delete(&format!("/api/friends/{}", ann.identity.id))
            .authorization_bearer(&bo.token)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<FriendshipDTO>().status, FriendshipStatus::None);

        let friends = server
            .get("/api/friends")
            .authorization_bearer(&ann.token)
            .await
            .json::<Vec<Identity>>();
        assert!(friends.is_empty());

        let response = server
            .delete(&format!("/api/friends/{}", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], "not_connected");
    }

    #[tokio::test]
    async fn test_self_and_unknown_targets() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;

        let response = server
            .post(&format!("/api/friends/{}/request", ann.identity.id))
            .authorization_bearer(&ann.token)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "invalid_invitee");

        server
            .post("/api/friends/4242/request")
            .authorization_bearer(&ann.token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_ranks_and_excludes_caller() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let anna = seed_user(&state, "Anna").await;
        let hanna = seed_user(&state, "Hanna").await;
        let annabel = seed_user(&state, "Annabel").await;
        seed_user(&state, "Bo").await;

        let results = server
            .get("/api/users/search")
            .add_query_param("q", "anna")
            .authorization_bearer(&hanna.token)
            .await
            .json::<Vec<Identity>>();
        let ids: Vec<i64> = results.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![anna.identity.id, annabel.identity.id]);

        let results = server
            .get("/api/users/search")
            .add_query_param("q", "ANNA")
            .authorization_bearer(&anna.token)
            .await
            .json::<Vec<Identity>>();
        let ids: Vec<i64> = results.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![annabel.identity.id, hanna.identity.id]);

        let response = server
            .get("/api/users/search")
            .add_query_param("q", "   ")
            .authorization_bearer(&anna.token)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["field"], "q");
    }

    #[tokio::test]
    async fn test_search_keeps_exact_match_among_many() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let caller = seed_user(&state, "Caller").await;
        for i in 0..250 {
            state
                .user
                .create(&CreateUserDTO {
                    email: format!("zed{i}@example.com"),
                    name: format!("Zed{i}"),
                    password: "not-a-hash".to_string(),
                    timezone: None,
                })
                .await
                .unwrap();
        }
        let ze = seed_user(&state, "Ze").await;

        let results = server
            .get("/api/users/search")
            .add_query_param("q", "ze")
            .authorization_bearer(&caller.token)
            .await
            .json::<Vec<Identity>>();
        assert_eq!(results.len(), 25);
        assert_eq!(results[0].id, ze.identity.id);
        assert!(results[1..].iter().all(|i| i.name.starts_with("Zed")));
    }

    #[tokio::test]
    async fn test_user_profile() {
        let state = create_test_state().await;
        let server = create_test_server(state.clone());
        let ann = seed_user(&state, "Ann").await;
        let bo = seed_user(&state, "Bo").await;

        let profile = server
            .get(&format!("/api/users/{}", bo.identity.id))
            .authorization_bearer(&ann.token)
            .await
            .json::<Identity>();
        assert_eq!(profile, bo.identity);

        server
            .get("/api/users/4242")
            .authorization_bearer(&ann.token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
