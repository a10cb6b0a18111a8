mod asset;
mod assignment;
mod branch;
mod department;
mod history;
mod notification;
mod organization;
mod token;
mod user;

pub use asset::{Asset, AssetStatus};
pub use assignment::{AssetAssignment, AssignmentStatus};
pub use branch::Branch;
pub use department::Department;
pub use history::{AssetHistory, HistoryAction};
pub use notification::Notification;
pub use organization::Organization;
pub use token::{Token, TokenType};
pub use user::{SanitizedUser, User, UserRole, UserStatus};
