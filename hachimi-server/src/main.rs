mod config;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};

use hachimi_core::{Conversion, Converter, Error, Parameters, Pool, VocabularyStore};

use crate::config::ServerConfig;

/// Body of the `/v1/convert` endpoint
#[derive(Deserialize)]
struct ConvertRequest {
	text: String,
	seed: Option<u64>,
}

/// Body of the `/v1/phrases` and `/v1/words` endpoints
#[derive(Deserialize)]
struct EntryRequest {
	text: String,
	length: Option<usize>,
}

#[derive(Serialize)]
struct ConvertResponse {
	#[serde(flatten)]
	conversion: Conversion,
	diff: usize,
}

/// Maps a core error to a response, logging server-side failures.
fn error_response(e: Error) -> HttpResponse {
	match e {
		Error::EmptyEntry => HttpResponse::BadRequest().body(e.to_string()),
		_ => {
			error!("Request failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP POST endpoint `/v1/convert`
///
/// Converts the whole text on a blocking worker thread and answers with the
/// output and the character counts, or with a single error.
#[post("/v1/convert")]
async fn post_convert(
	store: web::Data<VocabularyStore>,
	body: web::Json<ConvertRequest>,
) -> impl Responder {
	let ConvertRequest { text, seed } = body.into_inner();

	let outcome = web::block(move || {
		let converter = Converter::new(&store);
		match seed {
			Some(seed) => converter.convert_seeded(&text, seed),
			None => converter.convert(&text),
		}
	})
	.await;

	match outcome {
		Ok(Ok(conversion)) => {
			let diff = conversion.diff();
			HttpResponse::Ok().json(ConvertResponse { conversion, diff })
		}
		Ok(Err(e)) => error_response(e),
		Err(e) => error_response(Error::Worker(e.to_string())),
	}
}

/// Shared body of the two entry endpoints: trims the text, then appends it.
fn add_entry(store: &VocabularyStore, pool: Pool, body: EntryRequest) -> HttpResponse {
	let text = body.text.trim();
	if text.is_empty() {
		return HttpResponse::BadRequest().body(format!("Missing or empty {pool}"));
	}

	let added = match pool {
		Pool::Phrases => store.add_phrase(text, body.length),
		Pool::Words => store.add_word(text, body.length),
	};
	match added {
		Ok(()) => {
			info!("Added {pool} '{text}'");
			HttpResponse::Ok().body(format!("Added {pool}: {text}"))
		}
		Err(e) => error_response(e),
	}
}

#[put("/v1/phrases")]
async fn put_phrase(
	store: web::Data<VocabularyStore>,
	body: web::Json<EntryRequest>,
) -> impl Responder {
	add_entry(&store, Pool::Phrases, body.into_inner())
}

#[put("/v1/words")]
async fn put_word(
	store: web::Data<VocabularyStore>,
	body: web::Json<EntryRequest>,
) -> impl Responder {
	add_entry(&store, Pool::Words, body.into_inner())
}

#[get("/v1/parameters")]
async fn get_parameters(store: web::Data<VocabularyStore>) -> impl Responder {
	match store.parameters() {
		Ok(parameters) => HttpResponse::Ok().json(parameters),
		Err(e) => error_response(e),
	}
}

/// Replaces both generation parameters. Values are stored as sent.
#[put("/v1/parameters")]
async fn put_parameters(
	store: web::Data<VocabularyStore>,
	body: web::Json<Parameters>,
) -> impl Responder {
	let parameters = body.into_inner();
	match store.set_parameters(parameters) {
		Ok(()) => HttpResponse::Ok().json(parameters),
		Err(e) => error_response(e),
	}
}

#[get("/v1/vocabulary")]
async fn get_vocabulary(store: web::Data<VocabularyStore>) -> impl Responder {
	match store.snapshot() {
		Ok(vocabulary) => HttpResponse::Ok().json(vocabulary),
		Err(e) => error_response(e),
	}
}

/// Registers every endpoint on a service config.
fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(post_convert)
		.service(put_phrase)
		.service(put_word)
		.service(get_parameters)
		.service(put_parameters)
		.service(get_vocabulary);
}

/// Main entry point for the server.
///
/// Seeds the vocabulary with the configured parameters, shares it across
/// workers and serves the conversion and administration endpoints.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	let config = ServerConfig::from_env()?;
	let env = env_logger::Env::default().default_filter_or(config.rust_log.as_str());
	env_logger::Builder::from_env(env).init();

	let store = web::Data::new(VocabularyStore::with_parameters(config.parameters));
	info!("Listening on {}:{}", config.host, config.port);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(store.clone())
			.configure(routes)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await?;

	Ok(())
}
