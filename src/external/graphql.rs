use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::CatalogProvider;
use crate::config::BrowserConfig;
use crate::models::{FilterBounds, MovieDetail, PageResult, QuerySpec};
use crate::services::error::{BrowseError, BrowseResult};

const MENU_OPTIONS_QUERY: &str = r#"
query menuOptions {
    menuOptions {
        genres
        productionCountries
        releaseDateInterval { start end }
        runtimeInterval { start end }
    }
}"#;

const MOVIES_QUERY: &str = r#"
query movies($search: String, $filter: Filter, $sortBy: SortBy, $sortDirection: SortDirection, $page: Int, $pageSize: Int) {
    movies(search: $search, filter: $filter, sortBy: $sortBy, sortDirection: $sortDirection, page: $page, pageSize: $pageSize) {
        movies { poster_path original_title rating imdb_id }
        pageCount
    }
}"#;

const MOVIE_QUERY: &str = r#"
query movie($imdb_id: String!) {
    movie(imdb_id: $imdb_id) {
        original_title
        overview
        genres
        production_countries { name }
        production_companies
        runtime
        release_date
        trailer
        rating
    }
}"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuOptionsData {
    menu_options: FilterBounds,
}

#[derive(Debug, Deserialize)]
struct MoviesData {
    movies: PageResult,
}

#[derive(Debug, Deserialize)]
struct MovieData {
    movie: Option<MovieDetail>,
}

/// 电影目录 GraphQL 客户端
#[derive(Clone)]
pub struct GraphqlCatalogClient {
    client: Client,
    endpoint: String,
}

impl GraphqlCatalogClient {
    pub fn new(config: &BrowserConfig) -> BrowseResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrowseError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.api_url.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: Value,
    ) -> BrowseResult<T> {
        let request = GraphQlRequest {
            query,
            operation_name,
            variables,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(BrowseError::Http(response.status().as_u16()));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        if !body.errors.is_empty() {
            return Err(BrowseError::GraphQl(
                body.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        body.data.ok_or(BrowseError::MissingData("data"))
    }
}

#[async_trait]
impl CatalogProvider for GraphqlCatalogClient {
    async fn filter_bounds(&self) -> BrowseResult<FilterBounds> {
        let data: MenuOptionsData = self
            .execute("menuOptions", MENU_OPTIONS_QUERY, json!({}))
            .await?;
        Ok(data.menu_options)
    }

    async fn search_movies(&self, spec: &QuerySpec) -> BrowseResult<PageResult> {
        let variables = serde_json::to_value(spec.to_variables())?;
        let data: MoviesData = self.execute("movies", MOVIES_QUERY, variables).await?;
        Ok(data.movies)
    }

    async fn movie_detail(&self, id: &str) -> BrowseResult<MovieDetail> {
        let data: MovieData = self
            .execute("movie", MOVIE_QUERY, json!({ "imdb_id": id }))
            .await?;
        data.movie.ok_or(BrowseError::MissingData("movie"))
    }
}
