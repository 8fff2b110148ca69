use actix_web::{delete, get, http::header, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::balance::Balance;
use crate::clipboard::{copy_link, Clipboard};
use crate::error::SplitError;
use crate::schemas::{Expense, NewExpense, Participant, Settlement};
use crate::session::Session;

pub type SharedSession = web::Data<Mutex<Session>>;

/// Where share links point to.
#[derive(Clone, Debug)]
pub struct ShareSettings {
    pub public_url: String,
}

#[derive(Deserialize, Serialize)]
struct NameJson {
    name: String,
}

#[derive(Deserialize, Serialize)]
struct TokenJson {
    token: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

#[derive(Serialize)]
struct StateSnapshot<'a> {
    friends: &'a [Participant],
    expenses: &'a [Expense],
    balances: Balance,
    settlements: Vec<Settlement>,
}

fn snapshot(session: &Session) -> HttpResponse {
    HttpResponse::Ok().json(StateSnapshot {
        friends: session.participants(),
        expenses: session.expenses(),
        balances: session.calculate_balances(),
        settlements: session.calculate_settlements(),
    })
}

#[get("/")]
async fn get_state(
    request: HttpRequest,
    session: SharedSession,
    query: web::Query<TokenQuery>,
) -> HttpResponse {
    let mut session = session.lock().await;
    if let Some(token) = query.into_inner().token {
        match session.load_from_token(&token) {
            // Send the client back to the same path without the token
            Ok(()) => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, request.path()))
                    .finish();
            }
            Err(err) => {
                warn!("Failed to load data from token: {err}");
                session.load_from_store();
            }
        }
    }
    snapshot(&session)
}

#[get("/participants")]
async fn list_participants(session: SharedSession) -> HttpResponse {
    let session = session.lock().await;
    HttpResponse::Ok().json(session.participants())
}

#[post("/participants")]
async fn add_participant(
    session: SharedSession,
    json: web::Json<NameJson>,
) -> Result<HttpResponse, SplitError> {
    let participant = session.lock().await.add_participant(&json.name)?;
    Ok(HttpResponse::Created().json(participant))
}

#[delete("/participants/{id}")]
async fn remove_participant(session: SharedSession, id: web::Path<String>) -> HttpResponse {
    session.lock().await.remove_participant(&id);
    HttpResponse::Ok().body("Participant removed")
}

#[get("/participants/{id}/name")]
async fn get_name(session: SharedSession, id: web::Path<String>) -> HttpResponse {
    let name = session.lock().await.get_name(&id);
    HttpResponse::Ok().json(NameJson { name })
}

#[get("/expenses")]
async fn list_expenses(session: SharedSession) -> HttpResponse {
    let session = session.lock().await;
    HttpResponse::Ok().json(session.expenses())
}

#[post("/expenses")]
async fn add_expense(
    session: SharedSession,
    expense: web::Json<NewExpense>,
) -> Result<HttpResponse, SplitError> {
    let expense = session.lock().await.add_expense(expense.into_inner())?;
    Ok(HttpResponse::Created().json(expense))
}

#[delete("/expenses/{id}")]
async fn remove_expense(session: SharedSession, id: web::Path<String>) -> HttpResponse {
    session.lock().await.remove_expense(&id);
    HttpResponse::Ok().body("Expense removed")
}

#[get("/balances")]
async fn get_balances(session: SharedSession) -> HttpResponse {
    HttpResponse::Ok().json(session.lock().await.calculate_balances())
}

#[get("/settlements")]
async fn get_settlements(session: SharedSession) -> HttpResponse {
    HttpResponse::Ok().json(session.lock().await.calculate_settlements())
}

#[delete("/data")]
async fn clear_all(session: SharedSession) -> HttpResponse {
    session.lock().await.clear_all();
    HttpResponse::Ok().body("All data cleared")
}

#[get("/share")]
async fn get_share_link(
    session: SharedSession,
    settings: web::Data<ShareSettings>,
) -> Result<HttpResponse, SplitError> {
    let link = session
        .lock()
        .await
        .generate_shareable_link(&settings.public_url)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "link": link })))
}

#[post("/share/copy")]
async fn copy_share_link(
    session: SharedSession,
    settings: web::Data<ShareSettings>,
    clipboard: web::Data<dyn Clipboard>,
) -> HttpResponse {
    // The session is released before the clipboard program runs
    let link = session
        .lock()
        .await
        .generate_shareable_link(&settings.public_url);
    let copied = match link {
        Ok(link) => copy_link(&link, clipboard.get_ref()).await,
        Err(err) => {
            warn!("Failed to generate shareable link: {err}");
            false
        }
    };
    HttpResponse::Ok().json(serde_json::json!({ "copied": copied }))
}

#[post("/share/load")]
async fn load_share_token(
    session: SharedSession,
    json: web::Json<TokenJson>,
) -> Result<HttpResponse, SplitError> {
    let mut session = session.lock().await;
    session.load_from_token(&json.token)?;
    Ok(snapshot(&session))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_state)
        .service(list_participants)
        .service(add_participant)
        .service(remove_participant)
        .service(get_name)
        .service(list_expenses)
        .service(add_expense)
        .service(remove_expense)
        .service(get_balances)
        .service(get_settlements)
        .service(clear_all)
        .service(get_share_link)
        .service(copy_share_link)
        .service(load_share_token);
}
