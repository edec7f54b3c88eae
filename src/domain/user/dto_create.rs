#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Plain text; hashed before it reaches the repository
    pub password: String,
}
