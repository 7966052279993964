//! Per-entity view configuration.
//!
//! Each page the portal serves is described by a [`ViewSpec`]: a template
//! name plus an ordered list of independent [`AggregationTask`]s. Adding or
//! removing an entity type is a change to the tables in this module, not new
//! handler logic.

use url::Url;

use crate::aggregate::{AggregationTask, Extractor};
use crate::upstream::EndpointRequest;

/// Metric sets requested from the analytics service, per entity family.
const AUTHOR_METRIC_TYPES: &str =
    "ScholarlyOutput,CitationCount,hIndices,FieldWeightedCitationImpact,CitationsPerPublication,Collaboration";
const GROUP_METRIC_TYPES: &str =
    "ScholarlyOutput,CitationCount,FieldWeightedCitationImpact,CitationsPerPublication,Collaboration";
const TOPIC_METRIC_TYPES: &str =
    "ScholarlyOutput,CitationCount,FieldWeightedCitationImpact,InstitutionCount";
const YEAR_RANGE: &str = "5yrsAndCurrent";

/// Entity families the portal knows how to search and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Author,
    Country,
    CountryGroup,
    Institution,
    InstitutionGroup,
    Topic,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Author,
        EntityKind::Country,
        EntityKind::CountryGroup,
        EntityKind::Institution,
        EntityKind::InstitutionGroup,
        EntityKind::Topic,
    ];

    /// The identifier used in routes, query strings, and upstream paths.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Author => "author",
            EntityKind::Country => "country",
            EntityKind::CountryGroup => "countryGroup",
            EntityKind::Institution => "institution",
            EntityKind::InstitutionGroup => "institutionGroup",
            EntityKind::Topic => "topic",
        }
    }

    pub fn from_route(value: &str) -> Option<Self> {
        EntityKind::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Route serving this entity's search form.
    pub fn search_path(self) -> &'static str {
        match self {
            EntityKind::Author => "/authors",
            EntityKind::Country => "/countries",
            EntityKind::CountryGroup => "/countryGroups",
            EntityKind::Institution => "/institutions",
            EntityKind::InstitutionGroup => "/institutionGroups",
            EntityKind::Topic => "/topics",
        }
    }

    /// Route pattern serving this entity's detail page.
    pub fn detail_path(self) -> &'static str {
        match self {
            EntityKind::Author => "/author/{id}",
            EntityKind::Country => "/country/{id}",
            EntityKind::CountryGroup => "/countryGroup/{id}",
            EntityKind::Institution => "/institution/{id}",
            EntityKind::InstitutionGroup => "/institutionGroup/{id}",
            EntityKind::Topic => "/topic/{id}",
        }
    }

    fn detail_template(self) -> &'static str {
        match self {
            EntityKind::Author => "author.html",
            EntityKind::Country => "country.html",
            EntityKind::CountryGroup => "countryGroup.html",
            EntityKind::Institution => "institution.html",
            EntityKind::InstitutionGroup => "institutionGroup.html",
            EntityKind::Topic => "topic.html",
        }
    }

    /// Query parameter naming this entity's ids on the metrics endpoint.
    fn metrics_id_param(self) -> &'static str {
        match self {
            EntityKind::Author => "authors",
            EntityKind::Country => "countryIds",
            EntityKind::CountryGroup => "countryGroupIds",
            EntityKind::Institution => "institutionIds",
            EntityKind::InstitutionGroup => "institutionGroupIds",
            EntityKind::Topic => "topicIds",
        }
    }

    fn metric_types(self) -> &'static str {
        match self {
            EntityKind::Author => AUTHOR_METRIC_TYPES,
            EntityKind::Topic => TOPIC_METRIC_TYPES,
            _ => GROUP_METRIC_TYPES,
        }
    }
}

/// A page to aggregate and render: template name plus ordered task list.
#[derive(Debug, Clone)]
pub struct ViewSpec {
    pub template: &'static str,
    pub tasks: Vec<AggregationTask>,
}

/// Detail view for one entity. Every kind carries a `metrics` task; some
/// add a second independent task (publications, group details, top topics).
pub fn detail_view(kind: EntityKind, id: &str, base: &Url) -> ViewSpec {
    let mut tasks = vec![metrics_task(kind, id, base)];

    match kind {
        EntityKind::Author => tasks.push(AggregationTask {
            label: "docs",
            request: EndpointRequest::new(base, "content/search/scopus")
                .query("query", format!("au-id({id})"))
                .query("field", "eid,title,citedby-count,coverDate")
                .query("sort", "coverDate")
                .query("count", "5"),
            extract: Extractor("/search-results/entry"),
        }),
        EntityKind::CountryGroup => tasks.push(AggregationTask {
            label: "details",
            request: EndpointRequest::new(base, "analytics/scival/countryGroup").push_segment(id),
            extract: Extractor("/countryGroup"),
        }),
        EntityKind::InstitutionGroup => tasks.push(AggregationTask {
            label: "details",
            request: EndpointRequest::new(base, "analytics/scival/institutionGroup")
                .push_segment(id),
            extract: Extractor("/institutionGroup"),
        }),
        EntityKind::Institution => tasks.push(AggregationTask {
            label: "topics",
            request: EndpointRequest::new(base, "analytics/scival/topic/institutionId")
                .push_segment(id)
                .query("yearRange", YEAR_RANGE)
                .query("limit", "5"),
            extract: Extractor("/topics"),
        }),
        EntityKind::Country | EntityKind::Topic => {}
    }

    ViewSpec {
        template: kind.detail_template(),
        tasks,
    }
}

/// Search view: Scopus author search for authors, the analytics search
/// endpoint for everything else.
pub fn search_view(kind: EntityKind, name: &str, base: &Url) -> ViewSpec {
    match kind {
        EntityKind::Author => ViewSpec {
            template: "authorResults.html",
            tasks: vec![AggregationTask {
                label: "result",
                request: EndpointRequest::new(base, "content/search/author")
                    .query("query", author_query(name))
                    .query("count", "20"),
                extract: Extractor("/search-results"),
            }],
        },
        other => ViewSpec {
            template: "results.html",
            tasks: vec![AggregationTask {
                label: "results",
                request: EndpointRequest::new(
                    base,
                    &format!("analytics/scival/{}/search", other.as_str()),
                )
                .query("query", format!("name({name})")),
                extract: Extractor("/results"),
            }],
        },
    }
}

/// Abstract retrieval for a publication EID.
pub fn abstract_view(eid: &str, base: &Url) -> ViewSpec {
    ViewSpec {
        template: "abstract.html",
        tasks: vec![AggregationTask {
            label: "result",
            request: EndpointRequest::new(base, "content/abstract/eid")
                .push_segment(eid)
                .query("view", "META_ABS")
                .query("httpAccept", "application/json"),
            extract: Extractor("/abstracts-retrieval-response"),
        }],
    }
}

fn metrics_task(kind: EntityKind, id: &str, base: &Url) -> AggregationTask {
    let path = match kind {
        EntityKind::Author => "analytics/scival/author/metrics",
        EntityKind::Country => "analytics/scival/country/metrics",
        EntityKind::CountryGroup => "analytics/scival/countryGroup/metrics",
        EntityKind::Institution => "analytics/scival/institution/metrics",
        EntityKind::InstitutionGroup => "analytics/scival/institutionGroup/metrics",
        EntityKind::Topic => "analytics/scival/topic/metrics",
    };
    AggregationTask {
        label: "metrics",
        request: EndpointRequest::new(base, path)
            .query("metricTypes", kind.metric_types())
            .query("byYear", "false")
            .query("yearRange", YEAR_RANGE)
            .query(kind.metrics_id_param(), id),
        extract: Extractor("/results"),
    }
}

/// Scopus author query: last whitespace-separated word is the surname, the
/// rest (if any) are the given names.
pub fn author_query(full_name: &str) -> String {
    let mut parts: Vec<&str> = full_name.split_whitespace().collect();
    let last = parts.pop().unwrap_or_default();
    let mut query = format!("authlast({last})");
    if !parts.is_empty() {
        query.push_str(&format!(" and authfirst({})", parts.join(" ")));
    }
    query
}
