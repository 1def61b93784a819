//! Flowfields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! Every actor of a horde wants to reach the same place, rather than search a
//! path per actor the whole map is solved once from the target outwards and
//! every actor reads its direction from the result.
//!
//! The playable area is a grid described by a [GridGeometry]. For each
//! [MovementClass] three fields of the grid's size are kept:
//!
//! * Cost field - the cost of entering each cell, resolved by the [CostModel]
//! from the [TerrainMap] and the structures held by the [StructureRegistry].
//! `1.0` is open ground, [IMPASSABLE] can never be entered and anything else
//! is slow ground or a wall/building that has to be smashed through
//! * Integration field - the cheapest accumulated cost from each cell to the
//! target
//! * Flow field - a unit vector from each cell towards its cheapest neighbour
//!
//! ```text
//!  _____________________________
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! ```
//!
//! The fields are owned by the [FlowFieldEngine] and rebuilt when the
//! [RecalculationScheduler] allows. Single actors that need their own route
//! can use the [PointToPointSearch] instead.
//!

pub mod agent;
pub mod astar;
pub mod config;
pub mod cost_model;
pub mod engine;
pub mod fields;
pub mod grid;
pub mod scheduler;
pub mod structures;
pub mod terrain;
pub mod utilities;
