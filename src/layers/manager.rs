use crate::{
    layers::{base::LayerTrait, marker::Marker},
    prelude::HashMap,
    MapError, Result,
};

/// Manages layers for the map, handling ordering and lookup
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs (sorted by z-index, insertion order within a z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager. Layer IDs are unique.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("duplicate layer id '{}'", layer_id)).into());
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Gets a marker layer by ID
    pub fn marker(&self, layer_id: &str) -> Option<&Marker> {
        self.layers
            .get(layer_id)
            .and_then(|layer| layer.as_any().downcast_ref::<Marker>())
    }

    /// Gets a marker layer mutably by ID
    pub fn marker_mut(&mut self, layer_id: &str) -> Option<&mut Marker> {
        self.layers
            .get_mut(layer_id)
            .and_then(|layer| layer.as_any_mut().downcast_mut::<Marker>())
    }

    /// All marker layers, in render order
    pub fn markers(&self) -> Vec<&Marker> {
        self.layers()
            .into_iter()
            .filter_map(|layer| layer.as_any().downcast_ref::<Marker>())
            .collect()
    }

    /// Applies a function to every marker, in render order
    pub fn for_each_marker_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Marker),
    {
        for id in &self.render_order {
            if let Some(marker) = self
                .layers
                .get_mut(id)
                .and_then(|layer| layer.as_any_mut().downcast_mut::<Marker>())
            {
                f(marker);
            }
        }
    }

    /// Lists all layer IDs in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::layers::tile::TileLayer;

    fn marker(id: &str) -> Box<Marker> {
        Box::new(Marker::new(id.to_string(), LatLng::new(-1.3, 36.8)))
    }

    #[test]
    fn test_add_and_remove() {
        let mut manager = LayerManager::new();
        manager.add_layer(marker("a")).unwrap();
        manager.add_layer(marker("b")).unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.list_layers(), vec!["a".to_string(), "b".to_string()]);

        assert!(manager.remove_layer("a").is_some());
        assert!(manager.remove_layer("a").is_none());
        assert_eq!(manager.list_layers(), vec!["b".to_string()]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(marker("driver")).unwrap();
        assert!(manager.add_layer(marker("driver")).is_err());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_z_index_ordering() {
        let mut manager = LayerManager::new();
        let mut tiles = TileLayer::openstreetmap("osm".to_string(), "OSM".to_string());
        tiles.set_z_index(-1);

        manager.add_layer(marker("pickup")).unwrap();
        manager.add_layer(Box::new(tiles)).unwrap();

        assert_eq!(
            manager.list_layers(),
            vec!["osm".to_string(), "pickup".to_string()]
        );
    }

    #[test]
    fn test_marker_lookup_skips_other_layers() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(TileLayer::openstreetmap(
                "osm".to_string(),
                "OSM".to_string(),
            )))
            .unwrap();
        manager.add_layer(marker("pickup")).unwrap();

        assert!(manager.marker("osm").is_none());
        assert!(manager.marker("pickup").is_some());
        assert_eq!(manager.markers().len(), 1);

        manager
            .marker_mut("pickup")
            .unwrap()
            .set_position(LatLng::new(1.0, 2.0));
        assert_eq!(
            manager.marker("pickup").unwrap().position(),
            LatLng::new(1.0, 2.0)
        );
    }
}
