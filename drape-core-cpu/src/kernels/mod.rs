mod operations;
use operations::gather;

pub mod a_initialize;
pub mod b_integrate;
pub mod c_snapshot;
pub mod d_external_force;
pub mod e_solve_constraints;
pub mod f_normals;
pub mod g_constraint_error;
