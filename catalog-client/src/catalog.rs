//! Catalog API - product, category and subcategory operations
//!
//! `CatalogApi` is the seam the view controller talks to. `RemoteCatalog`
//! implements it over any [`HttpClient`]; every response is unwrapped
//! from its [`Envelope`], so `success: false` surfaces as
//! [`ClientError::Api`] exactly like a failed status code would.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::IgnoredAny;
use shared::{Category, Envelope, Product, ProductUpdate, Subcategory};

use crate::{ClientResult, HttpClient};

const PRODUCTS: &str = "products";
const CATEGORIES: &str = "categories";
const SUBCATEGORIES: &str = "subcategories";

/// Remote catalog operations
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /products`
    async fn list_products(&self) -> ClientResult<Vec<Product>>;

    /// `POST /products/remove` with `{id}`; returns the server's message, if any
    async fn remove_product(&self, id: &str) -> ClientResult<Option<String>>;

    /// `GET /categories`
    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    /// `GET /subcategories?category=:id`
    async fn list_subcategories(&self, category_id: &str) -> ClientResult<Vec<Subcategory>>;

    /// `PUT /products/:id`; returns the updated record when the server echoes it
    async fn update_product(&self, id: &str, update: &ProductUpdate)
    -> ClientResult<Option<Product>>;
}

#[async_trait]
impl<T: CatalogApi + ?Sized> CatalogApi for Arc<T> {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn remove_product(&self, id: &str) -> ClientResult<Option<String>> {
        (**self).remove_product(id).await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        (**self).list_categories().await
    }

    async fn list_subcategories(&self, category_id: &str) -> ClientResult<Vec<Subcategory>> {
        (**self).list_subcategories(category_id).await
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
    ) -> ClientResult<Option<Product>> {
        (**self).update_product(id, update).await
    }
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    id: &'a str,
}

/// `CatalogApi` over HTTP
#[derive(Debug, Clone)]
pub struct RemoteCatalog<H> {
    http: H,
}

impl<H: HttpClient> RemoteCatalog<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpClient> CatalogApi for RemoteCatalog<H> {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let resp: Envelope<Vec<Product>> = self.http.get(&[PRODUCTS], &[]).await?;
        let products = resp.into_data()?;
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    async fn remove_product(&self, id: &str) -> ClientResult<Option<String>> {
        let resp: Envelope<IgnoredAny> = self
            .http
            .post(&[PRODUCTS, "remove"], &RemoveRequest { id })
            .await?;
        let message = resp.message.clone();
        resp.into_result()?;
        tracing::info!(product_id = %id, "Product removed");
        Ok(message)
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let resp: Envelope<Vec<Category>> = self.http.get(&[CATEGORIES], &[]).await?;
        Ok(resp.into_data()?)
    }

    async fn list_subcategories(&self, category_id: &str) -> ClientResult<Vec<Subcategory>> {
        let resp: Envelope<Vec<Subcategory>> = self
            .http
            .get(&[SUBCATEGORIES], &[("category", category_id)])
            .await?;
        Ok(resp.into_data()?)
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
    ) -> ClientResult<Option<Product>> {
        let resp: Envelope<Product> = self.http.put(&[PRODUCTS, id], update).await?;
        let product = resp.into_result()?;
        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }
}
