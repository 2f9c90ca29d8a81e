//! In-memory reference world.
//!
//! `SimWorld` is a minimal `WorldContext` implementation backing the test
//! suites and serving as a template for wiring the engine into a real
//! simulation. Mutations are recorded in inspectable fields rather than
//! driving an actual game.

use rustc_hash::FxHashMap;

use crate::core::{HouseId, ObjectId, ObjectKind, TextId, WaypointId};

use super::{CellCoord, CountdownOp, WorldContext};

/// Per-house data for the reference world.
#[derive(Clone, Debug, Default)]
pub struct SimHouse {
    pub credits: i64,
    pub low_power: bool,
    pub factories: usize,
    allies: Vec<HouseId>,
}

/// Per-object data for the reference world.
#[derive(Clone, Debug)]
pub struct SimObject {
    pub house: HouseId,
    pub kind: ObjectKind,
    pub live: bool,
    pub powered: bool,
    pub sold: bool,
    pub evacuated: bool,
}

/// Recorded countdown state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Countdown {
    pub running: bool,
    pub seconds: u32,
    pub text: Option<TextId>,
}

/// Minimal in-memory world for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct SimWorld {
    houses: FxHashMap<HouseId, SimHouse>,
    objects: FxHashMap<ObjectId, SimObject>,
    waypoints: FxHashMap<WaypointId, CellCoord>,

    /// Reveal calls, in order: (house, center, radius).
    pub revealed: Vec<(Option<HouseId>, CellCoord, u16)>,
    /// Unreveal calls, in order.
    pub unrevealed: Vec<(Option<HouseId>, CellCoord, u16)>,
    /// Houses whose shroud was reset, in order.
    pub shroud_resets: Vec<HouseId>,
    /// Last ambient light adjustment: (intensity, step, rate).
    pub ambient_light: Option<(i32, i32, u32)>,
    /// Last viewport restriction: (x, y, width, height).
    pub viewport: Option<(i32, i32, u32, u32)>,
    /// Mission countdown state.
    pub countdown: Countdown,
}

impl SimWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a house with starting credits.
    pub fn add_house(&mut self, house: HouseId, credits: i64) -> &mut SimHouse {
        self.houses.entry(house).or_insert_with(|| SimHouse {
            credits,
            ..SimHouse::default()
        })
    }

    /// Declare two houses mutually allied.
    pub fn ally(&mut self, a: HouseId, b: HouseId) {
        if let Some(house) = self.houses.get_mut(&a) {
            if !house.allies.contains(&b) {
                house.allies.push(b);
            }
        }
        if let Some(house) = self.houses.get_mut(&b) {
            if !house.allies.contains(&a) {
                house.allies.push(a);
            }
        }
    }

    /// Spawn a live object owned by a house.
    pub fn add_object(&mut self, object: ObjectId, house: HouseId, kind: ObjectKind) {
        self.objects.insert(
            object,
            SimObject {
                house,
                kind,
                live: true,
                powered: true,
                sold: false,
                evacuated: false,
            },
        );
    }

    /// Register a waypoint.
    pub fn add_waypoint(&mut self, waypoint: WaypointId, cell: CellCoord) {
        self.waypoints.insert(waypoint, cell);
    }

    /// Set a house's low-power flag.
    pub fn set_low_power(&mut self, house: HouseId, low: bool) {
        if let Some(h) = self.houses.get_mut(&house) {
            h.low_power = low;
        }
    }

    /// Set a house's credits.
    pub fn set_credits(&mut self, house: HouseId, credits: i64) {
        if let Some(h) = self.houses.get_mut(&house) {
            h.credits = credits;
        }
    }

    /// Set a house's factory count.
    pub fn set_factories(&mut self, house: HouseId, count: usize) {
        if let Some(h) = self.houses.get_mut(&house) {
            h.factories = count;
        }
    }

    /// Inspect an object.
    #[must_use]
    pub fn object(&self, object: ObjectId) -> Option<&SimObject> {
        self.objects.get(&object)
    }
}

impl WorldContext for SimWorld {
    fn houses(&self) -> Vec<HouseId> {
        let mut houses: Vec<_> = self.houses.keys().copied().collect();
        houses.sort_by_key(|h| h.0);
        houses
    }

    fn house_exists(&self, house: HouseId) -> bool {
        self.houses.contains_key(&house)
    }

    fn are_allied(&self, a: HouseId, b: HouseId) -> bool {
        if a == b {
            return true;
        }
        self.houses
            .get(&a)
            .is_some_and(|house| house.allies.contains(&b))
    }

    fn credits(&self, house: HouseId) -> Option<i64> {
        self.houses.get(&house).map(|h| h.credits)
    }

    fn is_low_power(&self, house: HouseId) -> bool {
        self.houses.get(&house).is_some_and(|h| h.low_power)
    }

    fn factory_count(&self, house: HouseId) -> usize {
        self.houses.get(&house).map_or(0, |h| h.factories)
    }

    fn is_live(&self, object: ObjectId) -> bool {
        self.objects.get(&object).is_some_and(|o| o.live)
    }

    fn object_house(&self, object: ObjectId) -> Option<HouseId> {
        self.objects.get(&object).filter(|o| o.live).map(|o| o.house)
    }

    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind> {
        self.objects.get(&object).filter(|o| o.live).map(|o| o.kind)
    }

    fn resolve_waypoint(&self, waypoint: WaypointId) -> Option<CellCoord> {
        self.waypoints.get(&waypoint).copied()
    }

    fn destroy_object(&mut self, object: ObjectId) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.live = false;
        }
    }

    fn sell_building(&mut self, building: ObjectId) {
        if let Some(o) = self.objects.get_mut(&building) {
            if o.live && o.kind == ObjectKind::Building {
                o.sold = true;
                o.live = false;
            }
        }
    }

    fn evacuate_garrison(&mut self, building: ObjectId) {
        if let Some(o) = self.objects.get_mut(&building) {
            if o.live {
                o.evacuated = true;
            }
        }
    }

    fn set_building_powered(&mut self, building: ObjectId, powered: bool) {
        if let Some(o) = self.objects.get_mut(&building) {
            if o.live {
                o.powered = powered;
            }
        }
    }

    fn reveal_around(&mut self, house: Option<HouseId>, center: CellCoord, radius: u16) {
        self.revealed.push((house, center, radius));
    }

    fn unreveal_around(&mut self, house: Option<HouseId>, center: CellCoord, radius: u16) {
        self.unrevealed.push((house, center, radius));
    }

    fn reset_shroud(&mut self, house: HouseId) {
        self.shroud_resets.push(house);
    }

    fn set_ambient_light(&mut self, intensity: i32, step: i32, rate: u32) {
        self.ambient_light = Some((intensity, step, rate));
    }

    fn set_viewport_bounds(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = Some((x, y, width, height));
    }

    fn control_countdown(&mut self, op: CountdownOp) {
        match op {
            CountdownOp::Start { seconds } => {
                self.countdown.seconds = seconds;
                self.countdown.running = true;
            }
            CountdownOp::Stop => self.countdown.running = false,
            CountdownOp::Set { seconds } => self.countdown.seconds = seconds,
            CountdownOp::SetText(text) => self.countdown.text = Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_two_houses() -> SimWorld {
        let mut world = SimWorld::new();
        world.add_house(HouseId::new(0), 5000);
        world.add_house(HouseId::new(1), 3000);
        world
    }

    #[test]
    fn test_house_queries() {
        let mut world = world_with_two_houses();

        assert_eq!(world.houses(), vec![HouseId::new(0), HouseId::new(1)]);
        assert!(world.house_exists(HouseId::new(0)));
        assert!(!world.house_exists(HouseId::new(9)));
        assert_eq!(world.credits(HouseId::new(1)), Some(3000));
        assert_eq!(world.credits(HouseId::new(9)), None);

        world.set_low_power(HouseId::new(0), true);
        assert!(world.is_low_power(HouseId::new(0)));
        assert!(!world.is_low_power(HouseId::new(1)));
    }

    #[test]
    fn test_alliances_are_mutual_and_reflexive() {
        let mut world = world_with_two_houses();
        world.ally(HouseId::new(0), HouseId::new(1));

        assert!(world.are_allied(HouseId::new(0), HouseId::new(1)));
        assert!(world.are_allied(HouseId::new(1), HouseId::new(0)));
        assert!(world.are_allied(HouseId::new(0), HouseId::new(0)));
        assert!(!world.are_allied(HouseId::new(0), HouseId::new(9)));
    }

    #[test]
    fn test_object_lifecycle() {
        let mut world = world_with_two_houses();
        let barracks = ObjectId::new(10);
        world.add_object(barracks, HouseId::new(0), ObjectKind::Building);

        assert!(world.is_live(barracks));
        assert_eq!(world.object_house(barracks), Some(HouseId::new(0)));
        assert_eq!(world.object_kind(barracks), Some(ObjectKind::Building));

        world.destroy_object(barracks);
        assert!(!world.is_live(barracks));
        assert_eq!(world.object_house(barracks), None);

        // Destroying again is a no-op, not an error.
        world.destroy_object(barracks);
        assert!(!world.is_live(barracks));
    }

    #[test]
    fn test_sell_requires_building() {
        let mut world = world_with_two_houses();
        let tank = ObjectId::new(11);
        world.add_object(tank, HouseId::new(0), ObjectKind::Vehicle);

        world.sell_building(tank);
        assert!(world.is_live(tank));
        assert!(!world.object(tank).unwrap().sold);
    }

    #[test]
    fn test_countdown_ops() {
        let mut world = SimWorld::new();

        world.control_countdown(CountdownOp::Start { seconds: 120 });
        assert!(world.countdown.running);
        assert_eq!(world.countdown.seconds, 120);

        world.control_countdown(CountdownOp::Set { seconds: 60 });
        assert!(world.countdown.running);
        assert_eq!(world.countdown.seconds, 60);

        world.control_countdown(CountdownOp::Stop);
        assert!(!world.countdown.running);

        world.control_countdown(CountdownOp::SetText(TextId(4)));
        assert_eq!(world.countdown.text, Some(TextId(4)));
    }

    #[test]
    fn test_waypoints() {
        let mut world = SimWorld::new();
        world.add_waypoint(WaypointId::new(3), CellCoord::new(10, 12));

        assert_eq!(
            world.resolve_waypoint(WaypointId::new(3)),
            Some(CellCoord::new(10, 12))
        );
        assert_eq!(world.resolve_waypoint(WaypointId::new(99)), None);
    }
}
