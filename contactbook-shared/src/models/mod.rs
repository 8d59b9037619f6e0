/// Domain entities and repository inputs
///
/// # Models
///
/// - `user`: User accounts and their token digests
/// - `contact`: Contacts owned by a user, plus search filters
/// - `address`: Addresses owned by a contact
/// - `paging`: Page selection and paging metadata

pub mod address;
pub mod contact;
pub mod paging;
pub mod user;
