//! Static route dataset and bidirectional distance lookup.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::{collation, models::Route};

fn route(origin: &str, destination: &str, distance_km: f64) -> Route {
    Route {
        origin: origin.to_string(),
        destination: destination.to_string(),
        distance_km,
    }
}

/// Built-in Brazilian intercity dataset.
static BUILTIN_ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
    vec![
        route("São Paulo, SP", "Rio de Janeiro, RJ", 430.0),
        route("São Paulo, SP", "Brasília, DF", 1015.0),
        route("Rio de Janeiro, RJ", "Brasília, DF", 1148.0),
        route("São Paulo, SP", "Campinas, SP", 95.0),
        route("Rio de Janeiro, RJ", "Niterói, RJ", 13.0),
        route("Belo Horizonte, MG", "Ouro Preto, MG", 100.0),
        route("São Paulo, SP", "Curitiba, PR", 408.0),
        route("São Paulo, SP", "Santos, SP", 72.0),
        route("Curitiba, PR", "Florianópolis, SC", 300.0),
        route("Porto Alegre, RS", "Florianópolis, SC", 460.0),
        route("Salvador, BA", "Recife, PE", 807.0),
        route("Fortaleza, CE", "Recife, PE", 803.0),
        route("Manaus, AM", "Belém, PA", 1600.0),
        route("Belém, PA", "São Luís, MA", 680.0),
        route("São Paulo, SP", "Belo Horizonte, MG", 586.0),
        route("Rio de Janeiro, RJ", "Belo Horizonte, MG", 434.0),
        route("Brasília, DF", "Goiânia, GO", 209.0),
        route("Goiânia, GO", "Cuiabá, MT", 924.0),
        route("Cuiabá, MT", "Campo Grande, MS", 690.0),
        route("Porto Alegre, RS", "São Paulo, SP", 1122.0),
        route("Recife, PE", "Maceió, AL", 267.0),
        route("Maceió, AL", "Aracaju, SE", 270.0),
        route("Aracaju, SE", "Salvador, BA", 327.0),
        route("Natal, RN", "Fortaleza, CE", 534.0),
        route("Teresina, PI", "São Luís, MA", 441.0),
        route("Vitória, ES", "Belo Horizonte, MG", 525.0),
        route("Vitória, ES", "Rio de Janeiro, RJ", 520.0),
        route("Porto Alegre, RS", "Curitiba, PR", 710.0),
        route("Fortaleza, CE", "Teresina, PI", 640.0),
        route("São Paulo, SP", "Ribeirão Preto, SP", 315.0),
        route("Campinas, SP", "Ribeirão Preto, SP", 150.0),
        route("Belo Horizonte, MG", "Uberlândia, MG", 531.0),
        route("Brasília, DF", "Belo Horizonte, MG", 716.0),
        route("Salvador, BA", "Vitória, ES", 920.0),
        route("Manaus, AM", "Porto Velho, RO", 790.0),
        route("Belém, PA", "Macapá, AP", 515.0),
    ]
});

/// Fixed set of undirected routes with city enumeration and
/// case/whitespace-insensitive distance lookup.
///
/// The route set never changes after construction; the sorted city
/// list is computed lazily and cached.
pub struct RouteTable {
    routes: Vec<Route>,
    cities: RwLock<Option<Vec<String>>>,
}

impl RouteTable {
    /// Build a table over the given route set.
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            cities: RwLock::new(None),
        }
    }

    /// Table over the built-in Brazilian dataset.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ROUTES.clone())
    }

    /// Load a custom route dataset from a JSON array of
    /// `{origin, destination, distance_km}` records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let routes: Vec<Route> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse routes from {}", path.display()))?;
        Ok(Self::new(routes))
    }

    /// All routes in table order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Distinct city names from both route endpoints, sorted with
    /// pt-BR collation. Duplicate-free and stable for a fixed table.
    pub fn all_cities(&self) -> Vec<String> {
        if let Some(cached) = self.cities.read().as_ref() {
            return cached.clone();
        }

        let mut unique = BTreeSet::new();
        for route in &self.routes {
            if !route.origin.is_empty() {
                unique.insert(route.origin.clone());
            }
            if !route.destination.is_empty() {
                unique.insert(route.destination.clone());
            }
        }

        let mut cities: Vec<String> = unique.into_iter().collect();
        cities.sort_by(|a, b| collation::compare(a, b));
        debug!("city list computed ({} cities)", cities.len());

        *self.cities.write() = Some(cities.clone());
        cities
    }

    /// Cities whose name starts with `prefix`, compared case- and
    /// accent-insensitively. An empty prefix returns every city.
    pub fn cities_matching(&self, prefix: &str) -> Vec<String> {
        let needle = collation::sort_key(prefix.trim());
        if needle.is_empty() {
            return self.all_cities();
        }

        self.all_cities()
            .into_iter()
            .filter(|city| collation::sort_key(city).starts_with(&needle))
            .collect()
    }

    /// Distance in km between two cities, matching a stored route in
    /// either direction after trimming and lowercasing both inputs.
    /// Returns `None` for empty inputs or when no pair matches.
    pub fn find_distance(&self, origin: &str, destination: &str) -> Option<f64> {
        let o = origin.trim().to_lowercase();
        let d = destination.trim().to_lowercase();
        if o.is_empty() || d.is_empty() {
            return None;
        }

        self.routes
            .iter()
            .find(|route| {
                let ro = route.origin.trim().to_lowercase();
                let rd = route.destination.trim().to_lowercase();
                (ro == o && rd == d) || (ro == d && rd == o)
            })
            .map(|route| route.distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_distance_in_both_directions() {
        let table = RouteTable::builtin();
        let forward = table.find_distance("São Paulo, SP", "Rio de Janeiro, RJ");
        let backward = table.find_distance("Rio de Janeiro, RJ", "São Paulo, SP");
        assert_eq!(forward, Some(430.0));
        assert_eq!(forward, backward);
    }

    #[test]
    fn symmetry_holds_for_every_route() {
        let table = RouteTable::builtin();
        for route in table.routes() {
            assert_eq!(
                table.find_distance(&route.origin, &route.destination),
                table.find_distance(&route.destination, &route.origin),
                "asymmetric lookup for {} / {}",
                route.origin,
                route.destination
            );
        }
    }

    #[test]
    fn lookup_ignores_case_and_surrounding_whitespace() {
        let table = RouteTable::builtin();
        assert_eq!(
            table.find_distance(" São Paulo, SP ", "rio de janeiro, rj"),
            table.find_distance("São Paulo, SP", "Rio de Janeiro, RJ")
        );
    }

    #[test]
    fn lookup_does_not_fold_accents() {
        let table = RouteTable::builtin();
        assert_eq!(table.find_distance("Sao Paulo, SP", "Rio de Janeiro, RJ"), None);
    }

    #[test]
    fn unknown_pair_and_empty_inputs_return_none() {
        let table = RouteTable::builtin();
        assert_eq!(table.find_distance("Unknown City", "São Paulo, SP"), None);
        assert_eq!(table.find_distance("", "São Paulo, SP"), None);
        assert_eq!(table.find_distance("São Paulo, SP", "   "), None);
    }

    #[test]
    fn city_list_is_unique_and_collated() {
        let table = RouteTable::builtin();
        let cities = table.all_cities();

        let mut deduped = cities.clone();
        deduped.dedup();
        assert_eq!(cities, deduped, "city list contains duplicates");

        let belem = cities.iter().position(|c| c == "Belém, PA").unwrap();
        let belo = cities.iter().position(|c| c == "Belo Horizonte, MG").unwrap();
        let brasilia = cities.iter().position(|c| c == "Brasília, DF").unwrap();
        assert!(belem < belo, "accented Belém must sort with the B entries");
        assert!(belo < brasilia);
    }

    #[test]
    fn city_list_is_stable_across_calls() {
        let table = RouteTable::builtin();
        assert_eq!(table.all_cities(), table.all_cities());
    }

    #[test]
    fn prefix_matching_ignores_accents() {
        let table = RouteTable::builtin();
        let matches = table.cities_matching("sao");
        assert!(matches.contains(&"São Paulo, SP".to_string()));
        assert!(matches.contains(&"São Luís, MA".to_string()));
        assert!(!matches.contains(&"Santos, SP".to_string()));
    }

    #[test]
    fn loads_routes_from_json() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("routes.json");
        fs::write(
            &path,
            r#"[{"origin": "A", "destination": "B", "distance_km": 12.5}]"#,
        )?;

        let table = RouteTable::from_json_file(&path)?;
        assert_eq!(table.find_distance("a", "b"), Some(12.5));
        assert_eq!(table.all_cities(), vec!["A".to_string(), "B".to_string()]);
        Ok(())
    }
}
