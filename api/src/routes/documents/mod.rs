pub mod upload_documents_request;
pub mod upload_documents_route;
