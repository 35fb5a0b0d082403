pub mod auth;
pub mod health;
pub mod labels;
pub mod statuses;
pub mod tasks;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(
            web::scope("/users")
                .service(users::create_user)
                .service(users::get_users)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user),
        )
        .service(
            web::scope("/statuses")
                .service(statuses::create_status)
                .service(statuses::get_statuses)
                .service(statuses::get_status)
                .service(statuses::update_status)
                .service(statuses::delete_status),
        )
        .service(
            web::scope("/labels")
                .service(labels::create_label)
                .service(labels::get_labels)
                .service(labels::get_label)
                .service(labels::update_label)
                .service(labels::delete_label),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::create_task)
                .service(tasks::get_tasks)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
