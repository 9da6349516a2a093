//! User-facing messages. The frontend shows these verbatim, so they stay in
//! Portuguese.

pub const MIN_PASSWORD_LENGTH: usize = 6;

// Errors
pub const UNAUTHORIZED: &str = "Credenciais inválidas";
pub const NOT_AUTHENTICATED: &str = "Token de acesso ausente ou inválido";
pub const ACCOUNT_INACTIVE: &str =
    "Você foi inativado por condutas inadequadas, entre em contato com o suporte.";
pub const ACCESS_DENIED_ADMIN: &str = "Acesso negado: apenas administradores";
pub const ACCESS_DENIED_MASTER: &str = "Acesso negado: apenas o administrador master";
pub const USER_NOT_FOUND: &str = "Usuário não encontrado";
pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";
pub const MISSING_FIELDS: &str = "Campos obrigatórios não fornecidos";
pub const USERNAME_EXISTS: &str = "Nome de usuário já existe";
pub const EMAIL_EXISTS: &str = "E-mail já cadastrado";
pub const USERNAME_OR_EMAIL_TAKEN: &str = "Nome de usuário ou e-mail já estão em uso";
pub const PASSWORD_TOO_SHORT: &str = "A senha deve ter pelo menos 6 caracteres";
pub const INVALID_PASSWORD: &str = "Senha atual incorreta";
pub const CANNOT_DELETE_SELF: &str = "Você não pode excluir sua própria conta por esta rota";
pub const CANNOT_MODIFY_SELF_STATUS: &str = "Você não pode alterar o próprio status";
pub const ADMIN_CANNOT_DELETE: &str =
    "Contas de administrador não podem ser excluídas por esta rota";
pub const COMMENT_REQUIRED: &str = "Comentário é obrigatório";
pub const COMMENT_BANNED: &str =
    "Comentário contém palavras não permitidas. Por favor, revise seu texto.";
pub const COMMENT_NOT_FOUND: &str = "Comentário não encontrado";
pub const COMMENT_FORBIDDEN: &str = "Não autorizado a deletar este comentário";
pub const INVALID_RATING: &str = "A nota deve ser entre 1 e 5";
pub const FAVORITE_NOT_FOUND: &str = "Favorito não encontrado";
pub const PRODUCT_ID_REQUIRED: &str = "product_id é obrigatório";
pub const TIP_NOT_FOUND: &str = "Dica não encontrada";
pub const FAQ_NOT_FOUND: &str = "FAQ não encontrada";
pub const SOCIAL_NOT_FOUND: &str = "Rede social não encontrada";
pub const MESSAGE_REQUIRED: &str = "Mensagem não fornecida.";
pub const INVALID_QUERY: &str = "Parâmetros de consulta inválidos";

// Successes
pub const USER_CREATED: &str = "Usuário cadastrado com sucesso";
pub const USER_UPDATED: &str = "Usuário atualizado com sucesso";
pub const USER_DELETED: &str = "Usuário excluído com sucesso";
pub const LOGIN_SUCCESS: &str = "Login bem-sucedido";
pub const PASSWORD_CHANGED: &str = "Senha alterada com sucesso";
pub const ADMIN_CREATED: &str = "Administrador criado com sucesso!";
pub const PRODUCT_CREATED: &str = "Produto criado com sucesso";
pub const PRODUCT_UPDATED: &str = "Produto atualizado com sucesso";
pub const PRODUCT_DELETED: &str = "Produto excluído com sucesso";
pub const FAVORITE_ADDED: &str = "Produto adicionado aos favoritos";
pub const FAVORITE_EXISTS: &str = "Produto já favoritado";
pub const FAVORITE_REMOVED: &str = "Produto removido dos favoritos";
pub const REVIEW_SUBMITTED: &str = "Avaliação enviada com sucesso";
pub const REVIEW_DELETED: &str = "Comentário deletado com sucesso";
pub const RATING_SUBMITTED: &str = "Nota registrada com sucesso";
