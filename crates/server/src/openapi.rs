use utoipa::OpenApi;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorBody { pub error: String, pub message: String, pub status: u16 }

#[derive(Serialize, ToSchema)]
pub struct ManufacturerDoc { pub code: i32, pub name: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailsDoc {
    pub body: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<ManufacturerDoc>,
    pub number_of_doors: Option<i32>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub mileage: Option<i32>,
    pub model_year: Option<i32>,
    pub production_year: Option<i32>,
    pub external_color: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LocationDoc {
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// `NEW` or `USED`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionDoc { New, Used }

#[derive(Serialize, ToSchema)]
pub struct CarInputDoc {
    pub condition: Option<ConditionDoc>,
    pub details: Option<DetailsDoc>,
    pub location: Option<LocationDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct LinkDoc { pub href: String }

#[derive(Serialize, ToSchema)]
pub struct CarLinksDoc {
    #[serde(rename = "self")]
    pub self_link: LinkDoc,
    pub cars: LinkDoc,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarDoc {
    pub id: i64,
    pub condition: ConditionDoc,
    pub details: DetailsDoc,
    pub location: LocationDoc,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub price: Option<String>,
    #[serde(rename = "_links")]
    pub links: CarLinksDoc,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedCarsDoc { pub car_list: Vec<CarDoc> }

#[derive(Serialize, ToSchema)]
pub struct CollectionLinksDoc {
    #[serde(rename = "self")]
    pub self_link: LinkDoc,
}

#[derive(Serialize, ToSchema)]
pub struct CarCollectionDoc {
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedCarsDoc>,
    #[serde(rename = "_links")]
    pub links: CollectionLinksDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::cars::list,
        crate::routes::cars::get,
        crate::routes::cars::create,
        crate::routes::cars::update,
        crate::routes::cars::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            ManufacturerDoc,
            DetailsDoc,
            LocationDoc,
            ConditionDoc,
            CarInputDoc,
            LinkDoc,
            CarLinksDoc,
            CarDoc,
            EmbeddedCarsDoc,
            CollectionLinksDoc,
            CarCollectionDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "cars")
    )
)]
pub struct ApiDoc;
