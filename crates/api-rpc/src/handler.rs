//! User Procedure Handlers
//!
//! Defines one procedure per `UserProcedure` variant. The match in
//! `define_user_procedure` is exhaustive, so adding a variant without a
//! handler does not compile.

use crate::error::RouterError;
use crate::procedure::{non_blank, Json, NoInput, ValidatorExt};
use crate::router::{Router, RouterBuilder};
use crate::types::into_api_user;
use std::sync::Arc;
use tether_core::application::{CreateUserRequest, UserService};
use tether_core::error::AppError;
use tether_protocol::{CreateUserInput, User, UserProcedure};

/// Build the router exposing the user API
pub fn user_router(service: Arc<UserService>) -> Result<Router, RouterError> {
    let mut builder = Router::builder();
    for procedure in UserProcedure::ALL {
        define_user_procedure(&mut builder, procedure, Arc::clone(&service))?;
    }
    Ok(builder.build())
}

fn define_user_procedure(
    builder: &mut RouterBuilder,
    procedure: UserProcedure,
    service: Arc<UserService>,
) -> Result<(), RouterError> {
    let name = procedure.name();
    let kind = procedure.kind();

    match procedure {
        UserProcedure::List => builder.define(name, kind, NoInput, move |()| {
            list_users(Arc::clone(&service))
        }),
        UserProcedure::ById => builder.define(name, kind, Json::<String>::new(), move |id| {
            user_by_id(Arc::clone(&service), id)
        }),
        UserProcedure::Create => {
            let check_name = non_blank("name");
            let validator = Json::<CreateUserInput>::new()
                .refine(move |input| check_name(input.name.as_str()).map(|_| input));
            builder.define(name, kind, validator, move |input| {
                create_user(Arc::clone(&service), input)
            })
        }
    }?;

    Ok(())
}

/// userList
async fn list_users(service: Arc<UserService>) -> Result<Vec<User>, AppError> {
    let users = service.list().await?;
    Ok(users.into_iter().map(into_api_user).collect())
}

/// userById - a miss is `None`, which goes out as `{"ok": null}`
async fn user_by_id(service: Arc<UserService>, id: String) -> Result<Option<User>, AppError> {
    let user = service.find_by_id(&id).await?;
    Ok(user.map(into_api_user))
}

/// userCreate
async fn create_user(
    service: Arc<UserService>,
    input: CreateUserInput,
) -> Result<User, AppError> {
    let user = service
        .create(CreateUserRequest { name: input.name })
        .await?;
    Ok(into_api_user(user))
}
