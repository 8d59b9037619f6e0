/// Integration tests for the use-case layer
///
/// Runs every use case against the in-memory store, so no database is needed.
/// Run with: cargo test -p contactbook-shared --test usecase_tests

use contactbook_shared::auth::authenticator::{AuthContext, TokenAuthenticator};
use contactbook_shared::auth::password::PasswordParams;
use contactbook_shared::repository::Repositories;
use contactbook_shared::usecase::address::{CreateAddressRequest, UpdateAddressRequest};
use contactbook_shared::usecase::contact::{
    CreateContactRequest, SearchContactRequest, UpdateContactRequest,
};
use contactbook_shared::usecase::user::{
    LoginUserRequest, RefreshTokenRequest, RegisterUserRequest,
};
use contactbook_shared::usecase::{AddressUseCase, ContactUseCase, UseCaseError, UserUseCase};

struct Fixture {
    users: UserUseCase,
    contacts: ContactUseCase,
    addresses: AddressUseCase,
    authenticator: TokenAuthenticator,
}

impl Fixture {
    fn new() -> Self {
        let repos = Repositories::memory();
        let authenticator = TokenAuthenticator::new(repos.users.clone());

        Self {
            users: UserUseCase::new(
                repos.users.clone(),
                authenticator.clone(),
                PasswordParams {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            ),
            contacts: ContactUseCase::new(repos.contacts.clone()),
            addresses: AddressUseCase::new(repos.contacts.clone(), repos.addresses.clone()),
            authenticator,
        }
    }

    async fn register(&self, id: &str) -> AuthContext {
        self.users
            .register(RegisterUserRequest {
                id: id.to_string(),
                password: "secret".to_string(),
                name: id.to_uppercase(),
            })
            .await
            .unwrap();
        AuthContext::new(id)
    }

    async fn contact(&self, auth: &AuthContext, first_name: &str) -> uuid::Uuid {
        self.contacts
            .create(
                auth,
                CreateContactRequest {
                    first_name: first_name.to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .id
    }
}

fn address_request(country: &str) -> CreateAddressRequest {
    CreateAddressRequest {
        street: Some("Main St 1".to_string()),
        city: Some("Jakarta".to_string()),
        province: None,
        postal_code: Some("10110".to_string()),
        country: country.to_string(),
    }
}

#[tokio::test]
async fn test_contact_create_then_get() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;

    let created = fx
        .contacts
        .create(
            &auth,
            CreateContactRequest {
                first_name: "Ann".to_string(),
                last_name: Some("Smith".to_string()),
                email: Some("ann@example.com".to_string()),
                phone: Some("0812345".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(!created.id.is_nil());

    let fetched = fx.contacts.get(&auth, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_contact_partial_update() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;

    let created = fx
        .contacts
        .create(
            &auth,
            CreateContactRequest {
                first_name: "Ann".to_string(),
                last_name: Some("Smith".to_string()),
                email: Some("ann@example.com".to_string()),
                phone: None,
            },
        )
        .await
        .unwrap();

    let updated = fx
        .contacts
        .update(
            &auth,
            created.id,
            UpdateContactRequest {
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Ann");
    assert_eq!(updated.last_name.as_deref(), Some("Smith"));
    assert_eq!(updated.email.as_deref(), Some("ann@example.com"));
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_contact_double_delete_is_not_found() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;
    let id = fx.contact(&auth, "Ann").await;

    assert!(fx.contacts.delete(&auth, id).await.unwrap());
    assert!(matches!(
        fx.contacts.delete(&auth, id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.contacts.get(&auth, id).await,
        Err(UseCaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_contact_search_paging() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;
    for i in 0..25 {
        fx.contact(&auth, &format!("Contact {:02}", i)).await;
    }

    let page = |n: i64| SearchContactRequest {
        page: Some(n),
        size: Some(10),
        ..Default::default()
    };

    let (items, paging) = fx.contacts.search(&auth, page(1)).await.unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0].first_name, "Contact 00");
    assert_eq!(paging.total_item, 25);
    assert_eq!(paging.total_page, 3);

    let (items, _) = fx.contacts.search(&auth, page(3)).await.unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[4].first_name, "Contact 24");

    let (items, paging) = fx.contacts.search(&auth, page(4)).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(paging.page, 4);
    assert_eq!(paging.total_page, 3);
}

#[tokio::test]
async fn test_contact_search_filters() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;

    for (first, last, email) in [
        ("Ann", Some("Smith"), Some("ann@example.com")),
        ("Bob", Some("Annett"), Some("bob@example.org")),
        ("Cid", None, Some("cid@example.com")),
    ] {
        fx.contacts
            .create(
                &auth,
                CreateContactRequest {
                    first_name: first.to_string(),
                    last_name: last.map(String::from),
                    email: email.map(String::from),
                    phone: None,
                },
            )
            .await
            .unwrap();
    }

    let (items, paging) = fx
        .contacts
        .search(
            &auth,
            SearchContactRequest {
                name: Some("ann".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let names: Vec<_> = items.iter().map(|c| c.first_name.as_str()).collect();
    assert_eq!(names, ["Ann", "Bob"]);
    assert_eq!(paging.total_item, 2);

    let (items, _) = fx
        .contacts
        .search(
            &auth,
            SearchContactRequest {
                name: Some("ann".to_string()),
                email: Some(".COM".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].first_name, "Ann");

    let (items, _) = fx
        .contacts
        .search(
            &auth,
            SearchContactRequest {
                name: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_other_users_resources_are_not_found() {
    let fx = Fixture::new();
    let jane = fx.register("jane").await;
    let mallory = fx.register("mallory").await;

    let contact_id = fx.contact(&jane, "Ann").await;
    let address = fx
        .addresses
        .create(&jane, contact_id, address_request("Indonesia"))
        .await
        .unwrap();

    assert!(matches!(
        fx.contacts.get(&mallory, contact_id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.contacts
            .update(&mallory, contact_id, UpdateContactRequest::default())
            .await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.contacts.delete(&mallory, contact_id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.addresses.get(&mallory, contact_id, address.id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.addresses.list(&mallory, contact_id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.addresses.delete(&mallory, contact_id, address.id).await,
        Err(UseCaseError::NotFound(_))
    ));

    let (items, _) = fx
        .contacts
        .search(&mallory, SearchContactRequest::default())
        .await
        .unwrap();
    assert!(items.is_empty());

    // Still intact for the owner
    assert!(fx.addresses.get(&jane, contact_id, address.id).await.is_ok());
}

#[tokio::test]
async fn test_address_lifecycle() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;
    let contact_id = fx.contact(&auth, "Ann").await;

    let created = fx
        .addresses
        .create(&auth, contact_id, address_request("Indonesia"))
        .await
        .unwrap();
    fx.addresses
        .create(&auth, contact_id, address_request("Malaysia"))
        .await
        .unwrap();

    let updated = fx
        .addresses
        .update(
            &auth,
            contact_id,
            created.id,
            UpdateAddressRequest {
                city: Some("Bandung".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.city.as_deref(), Some("Bandung"));
    assert_eq!(updated.street.as_deref(), Some("Main St 1"));
    assert_eq!(updated.country, "Indonesia");

    let listed = fx.addresses.list(&auth, contact_id).await.unwrap();
    let countries: Vec<_> = listed.iter().map(|a| a.country.as_str()).collect();
    assert_eq!(countries, ["Indonesia", "Malaysia"]);

    assert!(fx.addresses.delete(&auth, contact_id, created.id).await.unwrap());
    assert!(matches!(
        fx.addresses.delete(&auth, contact_id, created.id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert_eq!(fx.addresses.list(&auth, contact_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_address_requires_country() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;
    let contact_id = fx.contact(&auth, "Ann").await;

    let err = fx
        .addresses
        .create(&auth, contact_id, address_request(""))
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::Validation(m) if m == "country is required"));
}

#[tokio::test]
async fn test_contact_delete_cascades_to_addresses() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;
    let contact_id = fx.contact(&auth, "Ann").await;
    let address = fx
        .addresses
        .create(&auth, contact_id, address_request("Indonesia"))
        .await
        .unwrap();

    fx.contacts.delete(&auth, contact_id).await.unwrap();

    assert!(matches!(
        fx.addresses.get(&auth, contact_id, address.id).await,
        Err(UseCaseError::NotFound(_))
    ));
    assert!(matches!(
        fx.addresses.list(&auth, contact_id).await,
        Err(UseCaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let fx = Fixture::new();
    fx.register("jane").await;

    let err = fx
        .users
        .register(RegisterUserRequest {
            id: "jane".to_string(),
            password: "other".to_string(),
            name: "Other".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::Conflict(_)));
}

#[tokio::test]
async fn test_session_lifecycle() {
    let fx = Fixture::new();
    let auth = fx.register("jane").await;

    let login = fx
        .users
        .login(LoginUserRequest {
            id: "jane".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(
        fx.authenticator.authenticate(&login.token).await.unwrap(),
        auth
    );

    // Refresh kills the previous pair
    let refreshed = fx
        .users
        .refresh_token(RefreshTokenRequest {
            refresh_token: login.refresh_token.clone(),
        })
        .await
        .unwrap();
    assert!(fx.authenticator.authenticate(&login.token).await.is_err());
    assert!(matches!(
        fx.users
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await,
        Err(UseCaseError::Unauthorized(_))
    ));

    // Logout kills the current pair
    assert!(fx.users.logout(&auth).await.unwrap());
    assert!(fx.authenticator.authenticate(&refreshed.token).await.is_err());
    assert!(fx
        .users
        .refresh_token(RefreshTokenRequest {
            refresh_token: refreshed.refresh_token,
        })
        .await
        .is_err());
}
