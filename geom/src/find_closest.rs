use std::collections::BTreeMap;
use std::fmt::Debug;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;

use crate::{Bounds, Distance, PolyLine, Pt2D};

/// A spatial index of polylines, answering "what's within some distance of this?" Candidates come
/// from an R-tree of bounding boxes and are then filtered by exact distance.
pub struct FindClosest<K> {
    geometries: BTreeMap<K, PolyLine>,
    rtree: RTree<GeomWithData<Rectangle<[f64; 2]>, K>>,
}

impl<K> FindClosest<K>
where
    K: Clone + Ord + Debug,
{
    pub fn new() -> FindClosest<K> {
        FindClosest {
            geometries: BTreeMap::new(),
            rtree: RTree::new(),
        }
    }

    pub fn add(&mut self, key: K, pl: &PolyLine) {
        let b = pl.get_bounds();
        self.rtree.insert(GeomWithData::new(
            Rectangle::from_corners([b.min_x, b.min_y], [b.max_x, b.max_y]),
            key.clone(),
        ));
        self.geometries.insert(key, pl.clone());
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&PolyLine> {
        self.geometries.get(key)
    }

    fn candidates(&self, query: &Bounds, max_dist: Distance) -> Vec<K> {
        let envelope = query.expand(max_dist).as_aabb();
        let mut keys: Vec<K> = self
            .rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|obj| obj.data.clone())
            .collect();
        // The R-tree doesn't promise any order
        keys.sort();
        keys.dedup();
        keys
    }

    fn filter_and_sort(&self, mut hits: Vec<(K, Distance)>, max_dist: Distance) -> Vec<(K, Distance)> {
        hits.retain(|(_, dist)| *dist <= max_dist);
        hits.sort_by(|(k1, d1), (k2, d2)| d1.cmp(d2).then_with(|| k1.cmp(k2)));
        hits
    }

    /// Every geometry within `max_dist` of the point, closest first. Ties are broken by key.
    pub fn all_close_pts(&self, query_pt: Pt2D, max_dist: Distance) -> Vec<(K, Distance)> {
        let hits = self
            .candidates(&Bounds::from(&[query_pt]), max_dist)
            .into_iter()
            .map(|key| {
                let dist = self.geometries[&key].dist_to_pt(query_pt);
                (key, dist)
            })
            .collect();
        self.filter_and_sort(hits, max_dist)
    }

    /// Every geometry within `max_dist` of any part of the query polyline, closest first. Ties are
    /// broken by key.
    pub fn all_close_to_polyline(&self, query: &PolyLine, max_dist: Distance) -> Vec<(K, Distance)> {
        let hits = self
            .candidates(&query.get_bounds(), max_dist)
            .into_iter()
            .map(|key| {
                let dist = self.geometries[&key].dist_to_polyline(query);
                (key, dist)
            })
            .collect();
        self.filter_and_sort(hits, max_dist)
    }
}

impl<K> Default for FindClosest<K>
where
    K: Clone + Ord + Debug,
{
    fn default() -> Self {
        FindClosest::new()
    }
}
