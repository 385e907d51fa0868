//! Hosted Data API access (PostgREST dialect). The client authenticates with
//! the service-role key, which bypasses row-level security policies, and is
//! built once at startup.
//!
//! The helpers are generic over the table name and row type; every Data API
//! repository goes through them.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::EnvConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub column: &'static str,
    pub direction: Direction,
}

impl Order {
    pub fn asc(column: &'static str) -> Self {
        Order {
            column,
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Order {
            column,
            direction: Direction::Desc,
        }
    }
}

/// Row filters rendered to PostgREST operators.
#[derive(Debug, Clone)]
pub enum Filter {
    Eq(String),
    In(Vec<String>),
    Like(String),
    Gt(String),
    Gte(String),
    Lt(String),
    Lte(String),
    IsNull,
}

impl Filter {
    pub fn eq(value: impl ToString) -> Self {
        Filter::Eq(value.to_string())
    }

    pub fn r#in<T: ToString>(values: impl IntoIterator<Item = T>) -> Self {
        Filter::In(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn gte(value: impl ToString) -> Self {
        Filter::Gte(value.to_string())
    }

    pub fn lte(value: impl ToString) -> Self {
        Filter::Lte(value.to_string())
    }

    fn render(&self) -> String {
        match self {
            Filter::Eq(v) => format!("eq.{v}"),
            Filter::In(vs) => format!("in.({})", vs.join(",")),
            Filter::Like(v) => format!("like.{v}"),
            Filter::Gt(v) => format!("gt.{v}"),
            Filter::Gte(v) => format!("gte.{v}"),
            Filter::Lt(v) => format!("lt.{v}"),
            Filter::Lte(v) => format!("lte.{v}"),
            Filter::IsNull => "is.null".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Column list; `*` when unset.
    pub select: Option<&'static str>,
    pub filters: Vec<(&'static str, Filter)>,
    pub order: Vec<Order>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl QueryOptions {
    pub fn ordered_by(column: &'static str) -> Self {
        QueryOptions {
            order: vec![Order::asc(column)],
            ..QueryOptions::default()
        }
    }

    pub fn ordered_by_desc(column: &'static str) -> Self {
        QueryOptions {
            order: vec![Order::desc(column)],
            ..QueryOptions::default()
        }
    }

    pub fn filter(mut self, column: &'static str, filter: Filter) -> Self {
        self.filters.push((column, filter));
        self
    }

    pub fn then_ordered_by(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.select.unwrap_or("*").to_string(),
        )];
        for (column, filter) in &self.filters {
            params.push((column.to_string(), filter.render()));
        }
        if !self.order.is_empty() {
            let rendered: Vec<String> = self
                .order
                .iter()
                .map(|order| {
                    let direction = match order.direction {
                        Direction::Asc => "asc",
                        Direction::Desc => "desc",
                    };
                    format!("{}.{direction}", order.column)
                })
                .collect();
            params.push(("order".to_string(), rendered.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}

#[derive(Clone)]
pub struct DataApiClient {
    http: reqwest::Client,
    /// `{project}/rest/v1`, without trailing slash.
    base_url: String,
}

impl DataApiClient {
    /// Fails fast when the endpoint or the service-role key is missing.
    pub fn from_config(config: &EnvConfig) -> Result<Self, AppError> {
        let (Some(url), Some(key)) = (
            config.supabase_url.as_deref(),
            config.supabase_service_role_key.as_deref(),
        ) else {
            return Err(AppError::data_api_missing());
        };

        let mut headers = HeaderMap::new();
        let mut apikey = HeaderValue::from_str(key)
            .map_err(|_| AppError::Config("SUPABASE_SERVICE_ROLE_KEY inválida".into()))?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| AppError::Config("SUPABASE_SERVICE_ROLE_KEY inválida".into()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(DataApiClient {
            http,
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::DataApi(format!("{status}: {body}")))
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        options: QueryOptions,
    ) -> Result<Vec<T>, AppError> {
        tracing::debug!(table, ?options, "data api select");
        let response = self
            .http
            .get(self.table_url(table))
            .query(&options.to_params())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Like [`select`](Self::select) but asks for an exact row count, taken
    /// from the `Content-Range` trailer (`items 0-9/42`).
    pub async fn select_with_count<T: DeserializeOwned>(
        &self,
        table: &str,
        options: QueryOptions,
    ) -> Result<(Vec<T>, u64), AppError> {
        let response = self
            .http
            .get(self.table_url(table))
            .query(&options.to_params())
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::check(response).await?;
        let count = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        Ok((response.json().await?, count))
    }

    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &impl Serialize,
    ) -> Result<Vec<T>, AppError> {
        tracing::debug!(table, "data api insert");
        let response = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Inserts a single record and returns it with its generated columns.
    pub async fn insert_one<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &impl Serialize,
    ) -> Result<T, AppError> {
        self.insert(table, body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::DataApi(format!("insert em {table} não retornou linhas")))
    }

    /// Updates by primary key; `None` when the row does not exist.
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        id: Uuid,
        body: &impl Serialize,
    ) -> Result<Option<T>, AppError> {
        tracing::debug!(table, %id, "data api update");
        let rows: Vec<T> = {
            let response = self
                .http
                .patch(self.table_url(table))
                .query(&[("id", format!("eq.{id}"))])
                .header("Prefer", "return=representation")
                .json(body)
                .send()
                .await?;
            Self::check(response).await?.json().await?
        };
        Ok(rows.into_iter().next())
    }

    /// Updates every row matching the filters. Used for dependent-reference
    /// cleanup before deletes.
    pub async fn update_matching(
        &self,
        table: &str,
        filters: &[(&'static str, Filter)],
        body: &impl Serialize,
    ) -> Result<(), AppError> {
        let params: Vec<(String, String)> = filters
            .iter()
            .map(|(column, filter)| (column.to_string(), filter.render()))
            .collect();
        let response = self
            .http
            .patch(self.table_url(table))
            .query(&params)
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Deletes every row matching the filters. Used when a child collection
    /// is replaced wholesale.
    pub async fn delete_matching(
        &self,
        table: &str,
        filters: &[(&'static str, Filter)],
    ) -> Result<(), AppError> {
        let params: Vec<(String, String)> = filters
            .iter()
            .map(|(column, filter)| (column.to_string(), filter.render()))
            .collect();
        let response = self
            .http
            .delete(self.table_url(table))
            .query(&params)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete(&self, table: &str, id: Uuid) -> Result<(), AppError> {
        tracing::debug!(table, %id, "data api delete");
        let response = self
            .http
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Absence is a normal result, never an error.
    pub async fn find_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: Uuid,
    ) -> Result<Option<T>, AppError> {
        let rows: Vec<T> = {
            let response = self
                .http
                .get(self.table_url(table))
                .query(&[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ])
                .send()
                .await?;
            Self::check(response).await?.json().await?
        };
        Ok(rows.into_iter().next())
    }

    /// Invokes a database function through `/rest/v1/rpc/{function}`.
    pub async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        params: &impl Serialize,
    ) -> Result<T, AppError> {
        let url = format!("{}/rpc/{function}", self.base_url);
        let response = self
            .http
            .request(Method::POST, url)
            .json(params)
            .send()
            .await?;
        let response = Self::check(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| AppError::DataApi(format!("rpc {function}: {e}")));
        }
        response
            .json()
            .await
            .map_err(|e| AppError::DataApi(format!("rpc {function}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_render_postgrest_operators() {
        assert_eq!(Filter::eq("loja").render(), "eq.loja");
        assert_eq!(
            Filter::r#in(["saida", "producao"]).render(),
            "in.(saida,producao)"
        );
        assert_eq!(Filter::Like("%sofa%".into()).render(), "like.%sofa%");
        assert_eq!(Filter::gte("2026-01-01").render(), "gte.2026-01-01");
        assert_eq!(Filter::lte("2026-01-31").render(), "lte.2026-01-31");
        assert_eq!(Filter::IsNull.render(), "is.null");
    }

    #[test]
    fn query_options_render_in_stable_order() {
        let options = QueryOptions::ordered_by("nome")
            .filter("tipo", Filter::eq("revenda"))
            .filter("estoque_minimo", Filter::Gt("0".into()));
        let params = options.to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("tipo".to_string(), "eq.revenda".to_string()),
                ("estoque_minimo".to_string(), "gt.0".to_string()),
                ("order".to_string(), "nome.asc".to_string()),
            ]
        );
    }

    #[test]
    fn limit_and_offset_are_rendered_last() {
        let options = QueryOptions {
            order: vec![Order::desc("data_pedido")],
            limit: Some(10),
            offset: Some(20),
            ..QueryOptions::default()
        };
        let params = options.to_params();
        assert_eq!(params[1].1, "data_pedido.desc");
        assert_eq!(params[2], ("limit".to_string(), "10".to_string()));
        assert_eq!(params[3], ("offset".to_string(), "20".to_string()));
    }

    #[test]
    fn multiple_order_terms_join_with_commas() {
        let options =
            QueryOptions::ordered_by("tipo").then_ordered_by(Order::asc("nome"));
        let params = options.to_params();
        assert_eq!(params[1], ("order".to_string(), "tipo.asc,nome.asc".to_string()));
    }

    #[test]
    fn client_requires_both_url_and_key() {
        let config = EnvConfig {
            supabase_url: Some("https://x.supabase.co".into()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            DataApiClient::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = EnvConfig {
            supabase_url: Some("https://x.supabase.co/".into()),
            supabase_service_role_key: Some("service-key".into()),
            ..EnvConfig::default()
        };
        let client = DataApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "https://x.supabase.co/rest/v1");
        assert_eq!(client.table_url("cores"), "https://x.supabase.co/rest/v1/cores");
    }
}
