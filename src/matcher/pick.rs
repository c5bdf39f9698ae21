use crate::path::{decode_component, dynamic_param, segmentize, splat_param};

use super::rank::rank_routes;
use super::types::{Params, RouteEntry, RouteMatch};

/// Matches `uri` against the candidates in ranked order and returns the
/// first success, falling back to the first default route encountered when
/// nothing else matches.
#[tracing::instrument(level = "trace", skip(routes), fields(uri = %uri, candidates = routes.len() as u64))]
pub fn pick(routes: &[RouteEntry], uri: &str) -> Option<RouteMatch> {
    let (uri_pathname, _) = crate::path::split_query(uri);
    let uri_segments = segmentize(uri_pathname);
    let is_root_uri = uri_segments.first().is_some_and(|s| s.is_empty());
    let mut default_match: Option<RouteMatch> = None;

    for ranked in rank_routes(routes) {
        let route = &routes[ranked.index];
        if route.is_default {
            if default_match.is_none() {
                default_match = Some(RouteMatch {
                    route: route.clone(),
                    params: Params::new(),
                    uri: uri_pathname.to_string(),
                });
            }
            continue;
        }

        let route_segments = segmentize(&route.pattern);
        let mut params = Params::new();
        let max = route_segments.len().max(uri_segments.len());
        let mut index = 0;
        let mut missed = false;

        while index < max {
            let route_segment = route_segments.get(index).copied();
            let uri_segment = uri_segments.get(index).copied();

            if let Some(name) = route_segment.and_then(splat_param) {
                // Splats are greedy and terminal: the decoded remainder
                // belongs to the splat and any trailing pattern segments are
                // irrelevant.
                let rest: Vec<String> = uri_segments[index.min(uri_segments.len())..]
                    .iter()
                    .map(|segment| decode_component(segment))
                    .collect();
                params.insert(name.to_string(), rest.join("/"));
                break;
            }
            let Some(uri_segment) = uri_segment else {
                // Requested path is shorter than the pattern.
                missed = true;
                break;
            };
            if let Some(name) = route_segment.and_then(dynamic_param) {
                // A bare root request satisfies a parameter segment without
                // capturing anything.
                if !is_root_uri {
                    params.insert(name.to_string(), decode_component(uri_segment));
                }
            } else if route_segment != Some(uri_segment) {
                missed = true;
                break;
            }
            index += 1;
        }

        if !missed {
            let consumed = &uri_segments[..index.min(uri_segments.len())];
            return Some(RouteMatch {
                route: route.clone(),
                params,
                uri: format!("/{}", consumed.join("/")),
            });
        }
    }

    default_match
}
