use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::{SortBy, SortOrder},
    dto::{
        categories::{CategoryList, CreateCategoryRequest, SubcategoryList},
        products::{CreateProductRequest, ProductList},
        search::{GroupedSearchResults, SearchResponse, SearchResultList, SuggestionList},
        subcategories::CreateSubcategoryRequest,
    },
    models::{Category, Product, Subcategory},
    response::{ApiResponse, Meta},
    routes::{categories, health, params, products, search as search_routes, subcategories},
    search::{
        ResultType, SearchResultItem,
        item::{EntityRef, ImageRef},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::list_categories,
        categories::list_subcategories,
        categories::create_category,
        subcategories::create_subcategory,
        products::list_products,
        products::create_product,
        search_routes::search,
        search_routes::advanced_search,
        search_routes::suggestions
    ),
    components(
        schemas(
            Category,
            Subcategory,
            Product,
            CreateCategoryRequest,
            CreateSubcategoryRequest,
            CreateProductRequest,
            CategoryList,
            SubcategoryList,
            ProductList,
            SortBy,
            SortOrder,
            ResultType,
            ImageRef,
            EntityRef,
            SearchResultItem,
            GroupedSearchResults,
            SearchResultList,
            SearchResponse,
            SuggestionList,
            params::Pagination,
            params::ListingParams,
            params::SearchParams,
            params::AdvancedSearchParams,
            Meta,
            ApiResponse<Category>,
            ApiResponse<CategoryList>,
            ApiResponse<SubcategoryList>,
            ApiResponse<Subcategory>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<SearchResponse>,
            ApiResponse<SearchResultList>,
            ApiResponse<SuggestionList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Subcategories", description = "Subcategory endpoints"),
        (name = "Products", description = "Product listing endpoints"),
        (name = "Search", description = "Search and suggestion endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
