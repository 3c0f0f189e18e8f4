use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Run a test against a freshly seeded store, injecting dependencies and
/// optionally logging in first.
///
/// `#[store_test]` leaves the session anonymous, `#[store_test(admin)]`
/// logs in the demo admin and `#[store_test(voter)]` the first demo voter.
///
/// Injectable dependencies are [`crate::store::ElectionStore`] and a
/// `tokio::sync::broadcast::Receiver<StoreEvent>`, subscribed after login so
/// it only sees what the test itself does.
#[proc_macro_attribute]
pub fn store_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the inner function so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_inner", name);
    item_fn.sig.ident = new_name.clone();

    // Log in as admin/voter if needed.
    let maybe_login = match parse_macro_input!(args as Option<Ident>) {
        None => quote! {},
        Some(arg) if arg == "admin" => quote! {
            store
                .login_admin(
                    crate::store::seed::DEMO_ADMIN_USERNAME,
                    crate::store::seed::DEMO_ADMIN_PASSWORD,
                )
                .unwrap();
        },
        Some(arg) if arg == "voter" => quote! {
            store
                .login_voter(
                    crate::store::seed::DEMO_VOTER_ID,
                    crate::store::seed::DEMO_VOTER_PASSWORD,
                )
                .unwrap();
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `admin` or `voter`")
                .into_compile_error()
                .into();
        }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// The test itself.
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(
                ["election_store"],
                None,
                None,
            );
            let store = crate::store::ElectionStore::new(crate::config::Config::default()).unwrap();

            #maybe_login

            #new_name(#(#test_args),*);
        }
    }
    .into()
}

/// Ensure the wrapped test is synchronous, extract parameters to inject, and
/// reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "Store operations are synchronous; remove `async`",
        ));
    }

    let mut has_store = false;
    let mut has_receiver = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(segment) = type_path.path.segments.last() {
                        if segment.ident == "ElectionStore" {
                            if has_store {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `ElectionStore`",
                                ));
                            }
                            has_store = true;
                            args.push(quote! { store.clone() });
                            continue;
                        } else if segment.ident == "Receiver" {
                            if has_receiver {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `Receiver<StoreEvent>`",
                                ));
                            }
                            has_receiver = true;
                            args.push(quote! { store.subscribe() });
                            continue;
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `store: ElectionStore` or `events: Receiver<StoreEvent>`",
        ));
    }

    Ok(args)
}
