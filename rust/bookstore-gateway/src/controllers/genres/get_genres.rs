use super::genres_dto::GenresQuery;
use crate::providers::downstream::{relay, Downstream};
use actix_web::{get, web, HttpResponse};
use api_utils::{ApiError, Validate};
use bytes::Bytes;

#[get("/genres")]
pub async fn get_genres(
    query: web::Query<GenresQuery>,
    downstream: web::Data<Downstream>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let ids = query.ids().join(",");
    let response = downstream
        .genres
        .forward(
            reqwest::Method::GET,
            "genres",
            Some(&format!("id={ids}")),
            None,
            Bytes::new(),
            None,
        )
        .await?;
    Ok(relay(response))
}

#[get("/genres/all")]
pub async fn get_all_genres(downstream: web::Data<Downstream>) -> Result<HttpResponse, ApiError> {
    let response = downstream
        .genres
        .forward(reqwest::Method::GET, "genres/all", None, None, Bytes::new(), None)
        .await?;
    Ok(relay(response))
}
