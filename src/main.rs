use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use slateboard::router::init_router;
use slateboard::state::init_app_state;
use slateboard::store::{Fields, SqlValue, Table, records};
use slateboard::utils::password::hash_password;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "create-superadmin" {
        handle_create_superadmin(args).await;
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the
                // `axum::rejection` target at TRACE level
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    axum::serve(listener, app).await.unwrap();
}

/// Superadmin accounts cannot be created through the API; this is the only
/// entry point that seeds one.
async fn handle_create_superadmin(args: Vec<String>) {
    if args.len() != 6 {
        eprintln!(
            "Usage: {} create-superadmin <username> <full_name> <email> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let username = &args[2];
    let full_name = &args[3];
    let email = &args[4];
    let password = &args[5];

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let hashed = match hash_password(password) {
        Ok(hashed) => hashed,
        Err(e) => {
            eprintln!("❌ Error hashing password: {:?}", e);
            std::process::exit(1);
        }
    };

    let mut fields = Fields::new();
    fields.push_text("username", username.as_str());
    fields.push_text("password", hashed);
    fields.push_text("full_name", full_name.as_str());
    fields.push_text("email", email.to_lowercase());
    fields.push("agreement_to_terms", SqlValue::Bool(true));
    fields.push("is_superadmin", SqlValue::Bool(true));

    match records::insert(&pool, Table::Admin, &fields).await {
        Ok(id) => {
            println!("✅ Superadmin created successfully!");
            println!("   Id: {}", id);
            println!("   Email: {}", email);
        }
        Err(e) => {
            eprintln!("❌ Error creating superadmin: {:?}", e);
            std::process::exit(1);
        }
    }
}
