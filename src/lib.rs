pub mod shared {
    pub mod core {
        pub mod counting;
        pub mod primitives;
        pub mod vote_record;
    }
    pub mod infrastructure {
        pub mod persistence_gateway;
    }
}

pub mod modules {
    pub mod votes {
        pub mod core {
            pub mod entry;
            pub mod state;
        }
        pub mod cache {
            pub mod vote_store;
        }
        pub mod use_cases {
            pub mod toggle_vote {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod pending_gate;
            }
            pub mod hydrate_vote_state {
                pub mod handler;
            }
            pub mod set_vote {
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod fetch_vote_state {
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod manage_items {
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod views {
            pub mod vote_binding;
        }
        pub mod session;
    }
}

pub mod shell;
