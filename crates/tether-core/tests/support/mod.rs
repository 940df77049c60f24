//! In-memory person backend served over the IPC bridge.

use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tether_core::{
    Call, Envelope, IpcDispatch, IpcServer, IpcServerHandle, Page, Person, PersonForCreate,
    PersonForUpdate, Result, TetherError,
};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct PersonBackend {
    persons: Mutex<Vec<Person>>,
}

#[derive(Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Deserialize)]
struct CreateArgs {
    data: PersonForCreate,
}

#[derive(Deserialize)]
struct UpdateArgs {
    id: String,
    data: PersonForUpdate,
}

#[derive(Deserialize)]
struct ListArgs {
    page: Option<Page>,
}

fn not_found() -> TetherError {
    TetherError::backend("not found", None)
}

impl PersonBackend {
    pub async fn len(&self) -> usize {
        self.persons.lock().await.len()
    }

    async fn handle(&self, call: &Call) -> Result<Value> {
        let mut persons = self.persons.lock().await;

        match call.route() {
            Some(("get", "person")) => {
                let IdArgs { id } = call.params()?;
                let person = persons.iter().find(|p| p.id == id).ok_or_else(not_found)?;
                Ok(serde_json::to_value(person)?)
            }
            Some(("create", "person")) => {
                let CreateArgs { data } = call.params()?;
                let id = uuid::Uuid::new_v4().simple().to_string();
                persons.push(Person {
                    id: id.clone(),
                    title: data.title,
                    name: data.name,
                    marketing: data.marketing.unwrap_or(false),
                });
                Ok(json!(format!("person:{}", id)))
            }
            Some(("update", "person")) => {
                let UpdateArgs { id, data } = call.params()?;
                let person = persons
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(not_found)?;
                if let Some(title) = data.title {
                    person.title = title;
                }
                if let Some(name) = data.name {
                    person.name = name;
                }
                if let Some(marketing) = data.marketing {
                    person.marketing = marketing;
                }
                Ok(json!(format!("person:{}", id)))
            }
            Some(("delete", "person")) => {
                let IdArgs { id } = call.params()?;
                let index = persons
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(not_found)?;
                persons.remove(index);
                Ok(json!(format!("person:{}", id)))
            }
            Some(("list", "persons")) => {
                let ListArgs { page } = call.params()?;
                let listed: Vec<&Person> = match page {
                    Some(page) => {
                        page.validate()?;
                        persons
                            .iter()
                            .skip(page.offset() as usize)
                            .take(usize::from(page.limit))
                            .collect()
                    }
                    None => persons.iter().collect(),
                };
                Ok(serde_json::to_value(listed)?)
            }
            _ => Err(TetherError::MethodNotFound {
                method: call.method().to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl IpcDispatch for PersonBackend {
    async fn dispatch(&self, call: Call) -> Envelope {
        match call.method() {
            // Answers with neither error nor result
            "broken_person" => Envelope::default(),
            // Holds its connection long enough for callers to give up
            "stall_person" => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Envelope::success(json!(true))
            }
            _ => self.handle(&call).await.into(),
        }
    }
}

/// Start a backend on a free local port.
pub async fn start_backend() -> (Arc<PersonBackend>, IpcServerHandle) {
    let backend = Arc::new(PersonBackend::default());
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let handle = IpcServer::start(addr, backend.clone()).await.unwrap();
    (backend, handle)
}
