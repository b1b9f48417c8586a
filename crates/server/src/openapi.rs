use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct SignupAddress { pub street: String, pub city: String, pub state: String, pub zip_code: String, pub country: String }

#[derive(ToSchema)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: SignupAddress,
}

#[derive(ToSchema)]
pub struct AnimalIdRequest { pub animal_id: Uuid }

#[derive(ToSchema)]
pub struct UserIdRequest { pub user_id: Uuid }

#[derive(ToSchema)]
pub struct SpeciesRequest { pub species: String }

#[derive(ToSchema)]
pub struct CreateAnimalRequest {
    pub user_id: Uuid,
    pub name: String,
    pub breed: String,
    pub species: String,
    pub age: i32,
    pub gender: String,
}

#[derive(ToSchema)]
pub struct SendMessageRequest { pub receiver_id: Uuid, pub content: String }

#[derive(ToSchema)]
pub struct OtherUserRequest { pub other_user_id: Uuid }

#[derive(ToSchema)]
pub struct NewsletterUpdateRequest { pub species: Vec<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::signup,
        crate::routes::auth::admin_login,
        crate::routes::users::all_details,
        crate::routes::users::delete,
        crate::routes::animals::get_all,
        crate::routes::animals::details,
        crate::routes::animals::by_species,
        crate::routes::animals::create,
        crate::routes::animals::delete,
        crate::routes::animals::top_by_city,
        crate::routes::messages::send,
        crate::routes::messages::conversation,
        crate::routes::messages::conversations,
        crate::routes::messages::mark_read,
        crate::routes::messages::unread_count,
        crate::routes::newsletter::subscriptions,
        crate::routes::newsletter::update,
        crate::routes::media::pipe,
        crate::routes::media::upload,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            SignupAddress,
            SignupRequest,
            AnimalIdRequest,
            UserIdRequest,
            SpeciesRequest,
            CreateAnimalRequest,
            SendMessageRequest,
            OtherUserRequest,
            NewsletterUpdateRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "admin"),
        (name = "animals"),
        (name = "messages"),
        (name = "newsletter"),
        (name = "media")
    )
)]
pub struct ApiDoc;
